use crate::graph::{ElementKind, ElementRef, Selection};

/// Decides when a selection change warrants new suggestions.
///
/// Suggestions are recomputed only when the element, its content and its
/// kind all differ from the previous selection event. Every event replaces
/// the remembered triple, whether or not it triggered a recompute.
#[derive(Debug, Default)]
pub struct SelectionGate {
    previous: Option<(ElementRef, String, ElementKind)>,
}

impl SelectionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `selection` and returns true if suggestions should be recomputed.
    pub fn should_recompute(&mut self, selection: &Selection) -> bool {
        let recompute = match &self.previous {
            None => true,
            Some((element, content, kind)) => {
                *element != selection.element
                    && *content != selection.content
                    && *kind != selection.kind
            }
        };
        self.previous = Some((selection.element, selection.content.clone(), selection.kind));
        recompute
    }

    /// Forgets the previous selection, so the next event always recomputes.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}
