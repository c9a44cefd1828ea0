//! Sparse grid of one display module and the select / move / swap protocol.
//!
//! Cells are addressed by 1-based (row, column). A cell holds at most one item;
//! empty cells are valid move targets. The grid itself is a snapshot: changes
//! are sent to the backend and the grid is refetched afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use caducados_core::{DomainError, DomainResult, Entity, ItemId};

use crate::item::{Cell, InventoryItem, Position};

/// Items of one module keyed by cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    module_name: String,
    cells: BTreeMap<Cell, InventoryItem>,
    shadowed: Vec<InventoryItem>,
}

impl ModuleGrid {
    /// Build a grid from a module listing.
    ///
    /// If the backend lists two items on the same cell, the later one wins and
    /// the earlier one is kept aside in [`ModuleGrid::shadowed`].
    pub fn new(module_name: impl Into<String>, items: impl IntoIterator<Item = InventoryItem>) -> Self {
        let mut cells = BTreeMap::new();
        let mut shadowed = Vec::new();
        for item in items {
            if let Some(previous) = cells.insert(item.cell(), item) {
                shadowed.push(previous);
            }
        }
        Self {
            module_name: module_name.into(),
            cells,
            shadowed,
        }
    }

    /// Items hidden behind another item on the same cell, in listing order.
    pub fn shadowed(&self) -> &[InventoryItem] {
        &self.shadowed
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn get(&self, cell: Cell) -> Option<&InventoryItem> {
        self.cells.get(&cell)
    }

    pub fn find(&self, id: ItemId) -> Option<&InventoryItem> {
        self.cells.values().find(|item| item.id == id)
    }

    pub fn items(&self) -> impl Iterator<Item = &InventoryItem> {
        self.cells.values()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn max_row(&self) -> u32 {
        self.cells.keys().map(|c| c.row).max().unwrap_or(0)
    }

    /// Layout for rendering: every row up to the highest occupied one, each
    /// with cells up to the highest occupied column of that row.
    pub fn rows(&self) -> Vec<GridRow<'_>> {
        (1..=self.max_row())
            .map(|row| {
                let max_col = self
                    .cells
                    .range(Cell::new(row, 0)..=Cell::new(row, u32::MAX))
                    .map(|(c, _)| c.column)
                    .max()
                    .unwrap_or(0);
                let cells = (1..=max_col)
                    .map(|column| {
                        let cell = Cell::new(row, column);
                        (cell, self.cells.get(&cell))
                    })
                    .collect();
                GridRow { row, cells }
            })
            .collect()
    }

    /// Apply a change locally, as the backend would once every call succeeded.
    ///
    /// Used for simulation; live screens refetch instead.
    pub fn apply(&mut self, change: &PositionChange) -> DomainResult<()> {
        let relocations = change.relocations();
        let mut moving = Vec::with_capacity(relocations.len());
        for r in &relocations {
            let cell = self
                .find(r.item_id)
                .map(InventoryItem::cell)
                .ok_or_else(|| DomainError::invariant(format!("item {} is not in this module", r.item_id)))?;
            moving.push(cell);
        }

        let mut lifted: Vec<InventoryItem> = moving
            .iter()
            .filter_map(|cell| self.cells.remove(cell))
            .collect();

        for r in &relocations {
            let Some(idx) = lifted.iter().position(|item| item.id == r.item_id) else {
                continue;
            };
            let mut item = lifted.swap_remove(idx);
            if r.to.module_name != self.module_name {
                continue;
            }
            let cell = r.to.cell();
            if self.cells.contains_key(&cell) {
                return Err(DomainError::invariant(format!(
                    "cell {cell} of {} is already occupied",
                    self.module_name
                )));
            }
            item.module_name = r.to.module_name.clone();
            item.row = r.to.row;
            item.column = r.to.column;
            self.cells.insert(cell, item);
        }
        Ok(())
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow<'a> {
    pub row: u32,
    pub cells: Vec<(Cell, Option<&'a InventoryItem>)>,
}

/// Single backend relocation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    pub item_id: ItemId,
    pub to: Position,
}

/// A confirmed-or-not change of placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionChange {
    /// Source goes to an empty cell.
    Move { item: InventoryItem, to: Position },
    /// Source and target exchange places.
    Swap {
        source: InventoryItem,
        target: InventoryItem,
        source_to: Position,
        target_to: Position,
    },
}

impl PositionChange {
    /// Backend calls, in the order they must be issued.
    ///
    /// For a swap the target is moved first, then the source. The pair is not
    /// atomic: if the second call fails both items share a cell until fixed.
    pub fn relocations(&self) -> Vec<Relocation> {
        match self {
            PositionChange::Move { item, to } => vec![Relocation {
                item_id: item.id,
                to: to.clone(),
            }],
            PositionChange::Swap {
                source,
                target,
                source_to,
                target_to,
            } => vec![
                Relocation {
                    item_id: target.id,
                    to: target_to.clone(),
                },
                Relocation {
                    item_id: source.id,
                    to: source_to.clone(),
                },
            ],
        }
    }

    pub fn is_swap(&self) -> bool {
        matches!(self, PositionChange::Swap { .. })
    }

    /// Question put to the user before any call is made.
    pub fn confirmation_prompt(&self) -> String {
        match self {
            PositionChange::Move { item, to } => format!("Move \"{}\" to {to}?", item.label()),
            PositionChange::Swap {
                source,
                target,
                source_to,
                ..
            } => format!(
                "Swap \"{}\" with \"{}\" in {source_to}?",
                source.label(),
                target.label()
            ),
        }
    }

    pub fn success_message(&self) -> &'static str {
        if self.is_swap() { "Swap completed" } else { "Product relocated" }
    }
}

/// What a tap on a cell did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    /// Empty cell with nothing selected.
    Ignored,
    /// The item became the pending source.
    Selected(ItemId),
    /// The selected cell was tapped again.
    Cleared,
    /// A move or swap awaits confirmation. The selection is kept until the
    /// caller clears it.
    Proposed(PositionChange),
}

/// Pending source of a move.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    source: Option<InventoryItem>,
}

impl Selection {
    pub fn selected(&self) -> Option<&InventoryItem> {
        self.source.as_ref()
    }

    pub fn clear(&mut self) {
        self.source = None;
    }

    pub fn tap(&mut self, grid: &ModuleGrid, cell: Cell) -> TapOutcome {
        let occupant = grid.get(cell);

        let Some(source) = &self.source else {
            return match occupant {
                Some(item) => {
                    self.source = Some(item.clone());
                    TapOutcome::Selected(item.id)
                }
                None => TapOutcome::Ignored,
            };
        };

        let same_cell = source.cell() == cell && source.module_name == grid.module_name();
        let same_item = occupant.is_some_and(|o| o.same_entity(source));
        if same_cell || same_item {
            self.source = None;
            return TapOutcome::Cleared;
        }

        let destination = Position {
            module_name: grid.module_name().to_string(),
            row: cell.row,
            column: cell.column,
        };
        let change = match occupant {
            None => PositionChange::Move {
                item: source.clone(),
                to: destination,
            },
            Some(target) => PositionChange::Swap {
                source: source.clone(),
                target: target.clone(),
                source_to: destination,
                target_to: source.position(),
            },
        };
        TapOutcome::Proposed(change)
    }
}
