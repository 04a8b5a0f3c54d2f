pub mod app;
pub mod registry;
pub mod store;
pub mod util;
pub mod workspace;

pub use app::WorkspaceApp;
pub use store::StoreClient;
pub use workspace::Workspace;
