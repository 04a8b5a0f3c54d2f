use eframe::egui::Color32;

/// Receives quick-prompt payloads; the default sink is the composer.
pub trait PromptSink {
    fn push_prompt(&mut self, prompt: &str);
}

#[derive(Default)]
pub struct ComposerSink {
    pub text: String,
}

impl PromptSink for ComposerSink {
    fn push_prompt(&mut self, prompt: &str) {
        self.text = prompt.to_owned();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Emotion,
    Animal,
    Stats,
    Knowledge,
}

impl Category {
    pub fn ring_color(self) -> Color32 {
        match self {
            Category::Emotion => Color32::from_rgb(246, 137, 92),
            Category::Animal => Color32::from_rgb(110, 201, 118),
            Category::Stats => Color32::from_rgb(103, 196, 255),
            Category::Knowledge => Color32::from_rgb(245, 206, 93),
        }
    }
}

// At most one node+hub pair is highlighted at a time.
#[derive(Clone, Debug)]
pub struct Activation {
    pub node: String,
    pub hub: String,
    pub category: Category,
    pub glyph: Option<String>,
}

#[derive(Default)]
pub struct ActivationState {
    active: Option<Activation>,
}

impl ActivationState {
    pub fn set_active(
        &mut self,
        node: &str,
        hub: &str,
        category: Category,
        glyph: Option<String>,
    ) {
        // Only the emotion category carries a display glyph.
        let glyph = match category {
            Category::Emotion => glyph,
            _ => None,
        };
        self.active = Some(Activation {
            node: node.to_owned(),
            hub: hub.to_owned(),
            category,
            glyph,
        });
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<&Activation> {
        self.active.as_ref()
    }

    pub fn highlights(&self, id: &str) -> Option<&Activation> {
        self.active
            .as_ref()
            .filter(|activation| activation.node == id || activation.hub == id)
    }
}

/// Short-lived suppression window for theme switches.
#[derive(Default)]
pub struct TransitionSuppression {
    until: Option<f64>,
}

impl TransitionSuppression {
    pub fn suppress_for(&mut self, now: f64, duration: f64) {
        self.until = Some(now + duration);
    }

    pub fn is_active(&self, now: f64) -> bool {
        self.until.is_some_and(|deadline| now < deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_is_exclusive() {
        let mut state = ActivationState::default();
        state.set_active("mood-today", "hub-emotions", Category::Emotion, Some("^_^".into()));
        state.set_active("stats-week", "hub-stats", Category::Stats, None);

        let active = state.active().expect("activation set");
        assert_eq!(active.node, "stats-week");
        assert!(state.highlights("mood-today").is_none());
        assert!(state.highlights("hub-stats").is_some());
    }

    #[test]
    fn glyph_only_survives_on_emotion() {
        let mut state = ActivationState::default();
        state.set_active("know-ask", "hub-knowledge", Category::Knowledge, Some("?".into()));
        assert!(state.active().and_then(|a| a.glyph.as_ref()).is_none());
    }

    #[test]
    fn suppression_expires() {
        let mut suppression = TransitionSuppression::default();
        suppression.suppress_for(10.0, 0.15);
        assert!(suppression.is_active(10.1));
        assert!(!suppression.is_active(10.2));
    }
}
