//! Scene hierarchy browser: row adapters, drag-drop reparenting, clipboard and
//! the panel that binds them to the active scene.

pub mod clipboard;
pub mod create;
pub mod node;
pub mod panel;
pub mod reparent;

pub use clipboard::{Clipboard, MemoryClipboard, PastePlacement};
pub use create::CreateKind;
pub use node::{DragPayload, HierarchyNode, MenuAction, NodeKey};
pub use panel::{DOCK, DockInfo, HierarchyPanel, PanelEvent, PanelState};
pub use reparent::ReparentIntent;
