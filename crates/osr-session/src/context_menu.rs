#![forbid(unsafe_code)]

//! Host-rendered context menu.
//!
//! The engine's own menu is suppressed; the session builds this list
//! instead and the host draws it with its own widgets.

use osr_core::geometry::Point;

use crate::edit::EditCommand;

/// Command id of a separator row.
pub const SEPARATOR_ID: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuItem {
    pub command_id: i32,
    pub label: &'static str,
}

impl MenuItem {
    pub const SEPARATOR: Self = Self {
        command_id: SEPARATOR_ID,
        label: "",
    };

    #[must_use]
    pub const fn command(command: EditCommand) -> Self {
        Self {
            command_id: command.command_id(),
            label: command.label(),
        }
    }

    #[must_use]
    pub const fn is_separator(&self) -> bool {
        self.command_id == SEPARATOR_ID
    }

    #[must_use]
    pub fn edit_command(&self) -> Option<EditCommand> {
        EditCommand::from_command_id(self.command_id)
    }
}

/// What the engine reported about the click that opened the menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextMenuParams {
    /// Click position in view coordinates.
    pub position: Point,
    pub selection_text: String,
    pub is_editable: bool,
}

impl ContextMenuParams {
    #[must_use]
    pub fn at(position: Point) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_selection(mut self, text: impl Into<String>) -> Self {
        self.selection_text = text.into();
        self
    }
}

/// A menu waiting for the host to draw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenu {
    pub items: Vec<MenuItem>,
    pub anchor: Point,
}

impl ContextMenu {
    /// Undo, Redo, separator, [Cut, Copy], Paste, [Delete], separator,
    /// Select All. Bracketed items need a selection.
    #[must_use]
    pub fn build(anchor: Point, has_selection: bool) -> Self {
        let mut items = vec![
            MenuItem::command(EditCommand::Undo),
            MenuItem::command(EditCommand::Redo),
            MenuItem::SEPARATOR,
        ];
        if has_selection {
            items.push(MenuItem::command(EditCommand::Cut));
            items.push(MenuItem::command(EditCommand::Copy));
        }
        items.push(MenuItem::command(EditCommand::Paste));
        if has_selection {
            items.push(MenuItem::command(EditCommand::Delete));
        }
        items.push(MenuItem::SEPARATOR);
        items.push(MenuItem::command(EditCommand::SelectAll));
        Self { items, anchor }
    }

    /// The item with `command_id`, if the menu offers it.
    #[must_use]
    pub fn find(&self, command_id: i32) -> Option<&MenuItem> {
        self.items
            .iter()
            .find(|item| !item.is_separator() && item.command_id == command_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(menu: &ContextMenu) -> Vec<i32> {
        menu.items.iter().map(|i| i.command_id).collect()
    }

    #[test]
    fn full_menu_with_selection() {
        let menu = ContextMenu::build(Point::new(4, 5), true);
        assert_eq!(
            ids(&menu),
            vec![1001, 1002, -1, 1003, 1004, 1005, 1006, -1, 1007]
        );
        assert_eq!(menu.anchor, Point::new(4, 5));
        assert_eq!(menu.items[8].label, "Select All");
    }

    #[test]
    fn selection_items_hidden_without_selection() {
        let menu = ContextMenu::build(Point::default(), false);
        assert_eq!(ids(&menu), vec![1001, 1002, -1, 1005, -1, 1007]);
        assert!(menu.find(EditCommand::Cut.command_id()).is_none());
        assert!(menu.find(SEPARATOR_ID).is_none());
    }

    #[test]
    fn items_map_back_to_commands() {
        let menu = ContextMenu::build(Point::default(), true);
        let commands: Vec<_> = menu.items.iter().filter_map(MenuItem::edit_command).collect();
        assert_eq!(commands, EditCommand::ALL.to_vec());
    }
}
