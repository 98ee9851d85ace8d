mod bakeries;
mod boundaries;

use std::{cell::RefCell, rc::Rc};

use egui::Response;
use walkers::{Plugin, Projector};

use crate::surface::{Marker, MarkerId, Overlay};

/// Draws everything registered on one pane: boundary overlays first,
/// then markers on top of them.
pub(crate) struct PaneLayer<'a> {
    pane: &'a str,
    overlays: &'a [Overlay],
    markers: &'a [Marker],
    clicked: Rc<RefCell<Vec<MarkerId>>>,
}

impl<'a> PaneLayer<'a> {
    pub(crate) fn new(
        pane: &'a str,
        overlays: &'a [Overlay],
        markers: &'a [Marker],
        clicked: Rc<RefCell<Vec<MarkerId>>>,
    ) -> Self {
        Self {
            pane,
            overlays,
            markers,
            clicked,
        }
    }
}

impl Plugin for PaneLayer<'_> {
    fn run(self: Box<Self>, ui: &mut egui::Ui, _response: &Response, projector: &Projector) {
        for overlay in self.overlays.iter().filter(|o| o.pane == self.pane) {
            overlay.draw(ui, projector);
        }

        for marker in self.markers.iter().filter(|m| m.pane == self.pane) {
            if marker.draw(ui, projector) {
                self.clicked.borrow_mut().push(marker.id);
            }
        }
    }
}
