#![forbid(unsafe_code)]

//! Engine cursor types → host cursor shapes.

use std::sync::atomic::{AtomicU8, Ordering};

/// Engine cursor vocabulary, in the engine's numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorType {
    Pointer,
    Cross,
    Hand,
    IBeam,
    Wait,
    Help,
    EastResize,
    NorthResize,
    NorthEastResize,
    NorthWestResize,
    SouthResize,
    SouthEastResize,
    SouthWestResize,
    WestResize,
    NorthSouthResize,
    EastWestResize,
    NorthEastSouthWestResize,
    NorthWestSouthEastResize,
    ColumnResize,
    RowResize,
    MiddlePanning,
    EastPanning,
    NorthPanning,
    NorthEastPanning,
    NorthWestPanning,
    SouthPanning,
    SouthEastPanning,
    SouthWestPanning,
    WestPanning,
    Move,
    VerticalText,
    Cell,
    ContextMenu,
    Alias,
    Progress,
    NoDrop,
    Copy,
    None,
    NotAllowed,
    ZoomIn,
    ZoomOut,
    Grab,
    Grabbing,
    MiddlePanningVertical,
    MiddlePanningHorizontal,
    Custom,
    DndNone,
    DndMove,
    DndCopy,
    DndLink,
}

impl CursorType {
    const ALL: [Self; 50] = [
        Self::Pointer,
        Self::Cross,
        Self::Hand,
        Self::IBeam,
        Self::Wait,
        Self::Help,
        Self::EastResize,
        Self::NorthResize,
        Self::NorthEastResize,
        Self::NorthWestResize,
        Self::SouthResize,
        Self::SouthEastResize,
        Self::SouthWestResize,
        Self::WestResize,
        Self::NorthSouthResize,
        Self::EastWestResize,
        Self::NorthEastSouthWestResize,
        Self::NorthWestSouthEastResize,
        Self::ColumnResize,
        Self::RowResize,
        Self::MiddlePanning,
        Self::EastPanning,
        Self::NorthPanning,
        Self::NorthEastPanning,
        Self::NorthWestPanning,
        Self::SouthPanning,
        Self::SouthEastPanning,
        Self::SouthWestPanning,
        Self::WestPanning,
        Self::Move,
        Self::VerticalText,
        Self::Cell,
        Self::ContextMenu,
        Self::Alias,
        Self::Progress,
        Self::NoDrop,
        Self::Copy,
        Self::None,
        Self::NotAllowed,
        Self::ZoomIn,
        Self::ZoomOut,
        Self::Grab,
        Self::Grabbing,
        Self::MiddlePanningVertical,
        Self::MiddlePanningHorizontal,
        Self::Custom,
        Self::DndNone,
        Self::DndMove,
        Self::DndCopy,
        Self::DndLink,
    ];

    /// Decode the engine's raw cursor number.
    #[must_use]
    pub fn from_raw(raw: i32) -> Option<Self> {
        usize::try_from(raw)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    /// Closest host cursor shape. Anything without a counterpart is an
    /// arrow.
    #[must_use]
    pub const fn host_cursor(self) -> HostCursor {
        match self {
            Self::Hand | Self::Grab | Self::Grabbing => HostCursor::Hand,
            Self::IBeam | Self::VerticalText => HostCursor::TextInput,
            Self::Cross | Self::Wait | Self::Move | Self::Cell | Self::DndMove => {
                HostCursor::ResizeAll
            }
            Self::NorthSouthResize | Self::RowResize | Self::NorthResize | Self::SouthResize => {
                HostCursor::ResizeNS
            }
            Self::EastWestResize | Self::ColumnResize | Self::EastResize | Self::WestResize => {
                HostCursor::ResizeEW
            }
            Self::NorthEastSouthWestResize | Self::NorthEastResize | Self::SouthWestResize => {
                HostCursor::ResizeNESW
            }
            Self::NorthWestSouthEastResize | Self::NorthWestResize | Self::SouthEastResize => {
                HostCursor::ResizeNWSE
            }
            Self::NotAllowed | Self::NoDrop | Self::DndNone => HostCursor::NotAllowed,
            _ => HostCursor::Arrow,
        }
    }
}

/// Host cursor shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum HostCursor {
    #[default]
    Arrow = 0,
    TextInput = 1,
    ResizeAll = 2,
    ResizeNS = 3,
    ResizeEW = 4,
    ResizeNESW = 5,
    ResizeNWSE = 6,
    Hand = 7,
    NotAllowed = 8,
}

impl HostCursor {
    const fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::TextInput,
            2 => Self::ResizeAll,
            3 => Self::ResizeNS,
            4 => Self::ResizeEW,
            5 => Self::ResizeNESW,
            6 => Self::ResizeNWSE,
            7 => Self::Hand,
            8 => Self::NotAllowed,
            _ => Self::Arrow,
        }
    }
}

/// Current host cursor, written by the engine thread and read by the
/// render thread.
#[derive(Debug, Default)]
pub struct CursorCell(AtomicU8);

impl CursorCell {
    pub fn set(&self, cursor: HostCursor) {
        self.0.store(cursor as u8, Ordering::Release);
    }

    #[must_use]
    pub fn get(&self) -> HostCursor {
        HostCursor::from_u8(self.0.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_numbers_follow_engine_order() {
        assert_eq!(CursorType::from_raw(0), Some(CursorType::Pointer));
        assert_eq!(CursorType::from_raw(3), Some(CursorType::IBeam));
        assert_eq!(CursorType::from_raw(49), Some(CursorType::DndLink));
        assert_eq!(CursorType::from_raw(50), None);
        assert_eq!(CursorType::from_raw(-1), None);
    }

    #[test]
    fn representative_mappings() {
        assert_eq!(CursorType::IBeam.host_cursor(), HostCursor::TextInput);
        assert_eq!(CursorType::Hand.host_cursor(), HostCursor::Hand);
        assert_eq!(CursorType::Grabbing.host_cursor(), HostCursor::Hand);
        assert_eq!(CursorType::RowResize.host_cursor(), HostCursor::ResizeNS);
        assert_eq!(CursorType::ColumnResize.host_cursor(), HostCursor::ResizeEW);
        assert_eq!(CursorType::SouthWestResize.host_cursor(), HostCursor::ResizeNESW);
        assert_eq!(CursorType::SouthEastResize.host_cursor(), HostCursor::ResizeNWSE);
        assert_eq!(CursorType::Wait.host_cursor(), HostCursor::ResizeAll);
        assert_eq!(CursorType::DndNone.host_cursor(), HostCursor::NotAllowed);
        assert_eq!(CursorType::ZoomIn.host_cursor(), HostCursor::Arrow);
        assert_eq!(CursorType::Custom.host_cursor(), HostCursor::Arrow);
    }

    #[test]
    fn cell_round_trips_every_shape() {
        let cell = CursorCell::default();
        assert_eq!(cell.get(), HostCursor::Arrow);
        for raw in 0..50 {
            let shape = CursorType::from_raw(raw).expect("known").host_cursor();
            cell.set(shape);
            assert_eq!(cell.get(), shape);
        }
    }
}
