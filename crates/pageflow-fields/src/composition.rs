//! Text entry with input-method composition.
//!
//! While an IME composition is in progress the typed text is staged locally
//! and never committed; the final text is committed once on composition end.

/// Events a text input reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositionEvent {
  Start,
  /// Intermediate text while composing.
  Update(String),
  End(String),
  /// Plain input outside any composition.
  Input(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Composition {
  #[default]
  Idle,
  Composing {
    staged: String,
  },
}

impl Composition {
  /// Advance the machine. Returns the text to commit, if any.
  pub fn apply(&mut self, event: CompositionEvent) -> Option<String> {
    match event {
      CompositionEvent::Start => {
        *self = Self::Composing {
          staged: String::new(),
        };
        None
      }
      CompositionEvent::Update(text) => {
        *self = Self::Composing { staged: text };
        None
      }
      CompositionEvent::Input(text) => match self {
        Self::Composing { staged } => {
          *staged = text;
          None
        }
        Self::Idle => Some(text),
      },
      CompositionEvent::End(text) => {
        *self = Self::Idle;
        Some(text)
      }
    }
  }

  pub fn is_composing(&self) -> bool {
    matches!(self, Self::Composing { .. })
  }

  /// Text to display: the staged text while composing, else `committed`.
  pub fn display<'a>(&'a self, committed: &'a str) -> &'a str {
    match self {
      Self::Composing { staged } => staged,
      Self::Idle => committed,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_plain_input_commits() {
    let mut state = Composition::default();
    assert_eq!(
      state.apply(CompositionEvent::Input("a".into())),
      Some("a".to_string())
    );
    assert!(!state.is_composing());
  }

  #[test]
  fn test_composition_commits_once() {
    let mut state = Composition::default();
    assert_eq!(state.apply(CompositionEvent::Start), None);
    assert_eq!(state.apply(CompositionEvent::Update("n".into())), None);
    assert_eq!(state.apply(CompositionEvent::Input("ni".into())), None);
    assert_eq!(state.display("old"), "ni");
    assert_eq!(
      state.apply(CompositionEvent::End("你".into())),
      Some("你".to_string())
    );
    assert_eq!(state.display("你"), "你");
    assert_eq!(state, Composition::Idle);
  }
}
