use clap::Parser;

use tetherboard::{StoreClient, WorkspaceApp};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the workspace persistence service.
    #[arg(long, env = "TETHERBOARD_SERVER", default_value = "http://127.0.0.1:8000")]
    server: String,

    /// Bearer token for the persistence service. Without it, save and
    /// load are disabled with a hint in the UI.
    #[arg(long, env = "TETHERBOARD_TOKEN")]
    token: Option<String>,

    #[arg(long, default_value = "midnight")]
    theme: String,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "tetherboard",
        options,
        Box::new(move |cc| {
            let store = StoreClient::new(args.server.clone(), args.token.clone());
            Ok(Box::new(WorkspaceApp::new(cc, store, args.theme.clone())))
        }),
    )
}
