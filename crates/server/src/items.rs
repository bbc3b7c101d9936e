//! Item stacks, container inventories, and the fragment item factory.

use serde::{Deserialize, Serialize};
use testament_engine::god::{FragmentNumber, GodType};

/// Slots in a single chest, barrel or shulker box.
pub const CONTAINER_SLOTS: usize = 27;

/// Center-first slot order used when placing a fragment into a container,
/// so it lands where the player looks first.
pub const PREFERRED_SLOTS: [usize; 7] = [13, 12, 14, 11, 15, 4, 22];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Fragment { god: GodType, number: FragmentNumber },
    /// Any other item, by name.
    Loot(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub kind: ItemKind,
    pub amount: u8,
    pub display_name: String,
    pub lore: Vec<String>,
}

impl ItemStack {
    pub fn loot(name: &str, amount: u8) -> Self {
        Self {
            kind: ItemKind::Loot(name.to_string()),
            amount,
            display_name: name.to_string(),
            lore: Vec::new(),
        }
    }

    /// The god and number, if this stack is a testament fragment.
    pub fn fragment(&self) -> Option<(GodType, FragmentNumber)> {
        match self.kind {
            ItemKind::Fragment { god, number } => Some((god, number)),
            ItemKind::Loot(_) => None,
        }
    }
}

/// Builds the item stacks the plugin hands out.
#[derive(Debug, Default, Clone, Copy)]
pub struct ItemFactory;

impl ItemFactory {
    pub fn fragment(god: GodType, number: FragmentNumber) -> ItemStack {
        ItemStack {
            kind: ItemKind::Fragment { god, number },
            amount: 1,
            display_name: format!("Fragment {} of the {} Testament", number, title(god)),
            lore: vec![
                format!("A shard of the {} god's testament.", god),
                format!("Fragment {}/{}", number, FragmentNumber::MAX),
                "Bring all seven to the altar.".to_string(),
            ],
        }
    }
}

/// "fallen" -> "Fallen"
pub fn title(god: GodType) -> String {
    let id = god.id();
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Fixed-size slot array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
}

impl Inventory {
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    pub fn container() -> Self {
        Self::new(CONTAINER_SLOTS)
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Put `item` in `slot`, returning whatever was there.
    pub fn set(&mut self, slot: usize, item: ItemStack) -> Option<ItemStack> {
        self.slots.get_mut(slot).and_then(|s| s.replace(item))
    }

    /// Place into the first free preferred slot, else the first free slot.
    /// Returns the slot used, or `None` when the inventory is full.
    pub fn insert_preferred(&mut self, item: ItemStack) -> Option<usize> {
        let slot = PREFERRED_SLOTS
            .iter()
            .copied()
            .find(|&i| matches!(self.slots.get(i), Some(None)))
            .or_else(|| self.slots.iter().position(Option::is_none))?;
        self.slots[slot] = Some(item);
        Some(slot)
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemStack> {
        self.slots.iter().flatten()
    }

    pub fn fragments(&self) -> Vec<(GodType, FragmentNumber)> {
        self.items().filter_map(ItemStack::fragment).collect()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}
