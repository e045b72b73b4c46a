//! Per-frame display resolution handed to the rendering host.

use arbor_parts::{Part, PartId};
use serde::{Deserialize, Serialize};

/// How a part should be drawn this frame, highest priority last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InteractionState {
    Default,
    Hovered,
    Intersecting,
    Selected,
}

impl InteractionState {
    pub fn resolve(part: &Part) -> Self {
        let s = part.state;
        if s.selected {
            InteractionState::Selected
        } else if s.intersecting {
            InteractionState::Intersecting
        } else if s.hovered {
            InteractionState::Hovered
        } else {
            InteractionState::Default
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderDirective {
    pub part: PartId,
    pub state: InteractionState,
    pub visible: bool,
    pub transparent: bool,
    pub show_connections: bool,
    pub structural_view: bool,
    /// Connection points with a mate this frame.
    pub connectors_in_use: usize,
}

impl RenderDirective {
    pub fn for_part(id: PartId, part: &Part) -> Self {
        Self {
            part: id,
            state: InteractionState::resolve(part),
            visible: part.display.visible,
            transparent: part.display.transparent,
            show_connections: part.display.show_connections,
            structural_view: part.display.structural_view,
            connectors_in_use: part.connectors_in_use(),
        }
    }
}
