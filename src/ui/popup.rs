use crate::traits::{InfoAnchor, InfoContent};
use instant::Instant;

/// Label of the button offered before a route distance is shown
pub const CALCULATE_LABEL: &str = "Calculate distance";

/// State of the single info panel a map shows at a time.
///
/// Mirrors how map SDK info windows behave: content and anchor are set
/// independently, and reopening without an anchor keeps the last one.
#[derive(Debug, Clone, Default)]
pub struct InfoPopup {
    content: Option<InfoContent>,
    anchor: Option<InfoAnchor>,
    visible: bool,
    opened_at: Option<Instant>,
}

impl InfoPopup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_content(&mut self, content: InfoContent) {
        self.content = Some(content);
    }

    pub fn open(&mut self, anchor: InfoAnchor) {
        if anchor != InfoAnchor::Current {
            self.anchor = Some(anchor);
        }
        self.visible = true;
        self.opened_at = Some(Instant::now());
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn content(&self) -> Option<&InfoContent> {
        self.content.as_ref()
    }

    pub fn anchor(&self) -> Option<InfoAnchor> {
        self.anchor
    }

    /// Time since the panel was last opened
    pub fn open_for(&self) -> Option<std::time::Duration> {
        if self.visible {
            self.opened_at.map(|t| t.elapsed())
        } else {
            None
        }
    }

    /// Plain text of the current content
    pub fn text(&self) -> Option<String> {
        self.content.as_ref().map(|content| match content {
            InfoContent::MarkerDetails { address } => address.clone(),
            InfoContent::CalculatePrompt => CALCULATE_LABEL.to_string(),
            InfoContent::Distance(label) => label.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;

    #[test]
    fn test_reopen_keeps_anchor() {
        let mut popup = InfoPopup::new();
        let at = InfoAnchor::At(LatLng::new(50.0, 20.0));

        popup.set_content(InfoContent::CalculatePrompt);
        popup.open(at);
        popup.close();
        assert!(!popup.is_visible());
        assert_eq!(popup.open_for(), None);

        popup.open(InfoAnchor::Current);
        assert!(popup.is_visible());
        assert_eq!(popup.anchor(), Some(at));
        assert_eq!(popup.text().as_deref(), Some(CALCULATE_LABEL));
    }
}
