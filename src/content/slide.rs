//! Slide codec — first line is the title, the remaining lines are the body.

/// A parsed slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideContent {
    pub title: String,
    pub body: String,
}

impl SlideContent {
    /// Parse slide content. Never fails: an empty string is an empty slide.
    pub fn parse(content: &str) -> Self {
        match content.split_once('\n') {
            Some((title, body)) => Self {
                title: title.to_string(),
                body: body.to_string(),
            },
            None => Self {
                title: content.to_string(),
                body: String::new(),
            },
        }
    }

    /// Replace the title, preserving the body.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replace the body, preserving the title.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    /// Serialize back into file content.
    ///
    /// The title/body separator is always emitted, so serialized content
    /// contains at least one newline.
    pub fn serialize(&self) -> String {
        format!("{}\n{}", self.title, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_title_from_body() {
        let slide = SlideContent::parse("Quarterly Review\nRevenue up.\nCosts down.");
        assert_eq!(slide.title, "Quarterly Review");
        assert_eq!(slide.body, "Revenue up.\nCosts down.");
    }

    #[test]
    fn single_line_is_all_title() {
        let slide = SlideContent::parse("Just a title");
        assert_eq!(slide.title, "Just a title");
        assert_eq!(slide.body, "");
    }

    #[test]
    fn editing_title_preserves_body() {
        let mut slide = SlideContent::parse("Old\nbody line 1\nbody line 2");
        slide.set_title("New");
        assert_eq!(slide.serialize(), "New\nbody line 1\nbody line 2");
    }

    #[test]
    fn editing_body_preserves_title() {
        let mut slide = SlideContent::parse("Title\nold body");
        slide.set_body("new body");
        assert_eq!(slide.serialize(), "Title\nnew body");
    }

    #[test]
    fn serialized_content_always_has_a_newline() {
        let mut slide = SlideContent::parse("");
        slide.set_title("T");
        assert!(slide.serialize().contains('\n'));

        let mut slide = SlideContent::parse("only title");
        slide.set_body("");
        assert!(slide.serialize().contains('\n'));
    }

    #[test]
    fn roundtrip_is_stable_after_first_serialize() {
        let slide = SlideContent::parse("T\nB");
        let once = slide.serialize();
        assert_eq!(SlideContent::parse(&once).serialize(), once);
    }
}
