//! Merchant trading.
//!
//! This module provides:
//! - Stock entries with a price and a finite quantity
//! - Buy and sell transactions between a player and a merchant NPC
//! - A plain-text price listing

use log::info;
use serde::{Deserialize, Serialize};

use crate::game::errors::{GameError, GameResult};
use crate::game::item::{find_item, Item};
use crate::game::npc::Npc;
use crate::game::player::Player;

/// One line of a merchant's stock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShopEntry {
    pub item: Item,
    pub price: u32,
    /// Units left; the entry is dropped when it reaches zero.
    pub quantity: u32,
}

impl ShopEntry {
    pub fn new(item: Item, price: u32, quantity: u32) -> Self {
        Self {
            item,
            price,
            quantity,
        }
    }

    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }

    /// Reduce stock by amount (returns actual amount reduced)
    pub fn reduce_stock(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.quantity);
        self.quantity -= actual;
        actual
    }
}

/// Receipt for a completed trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub item_name: String,
    pub gold: u32,
}

/// Buys one unit. On any error the player and merchant are left untouched.
pub fn buy(player: &mut Player, merchant: &mut Npc, item_name: &str) -> GameResult<Trade> {
    let idx = merchant
        .stock
        .iter()
        .position(|e| e.in_stock() && e.item.matches(item_name))
        .ok_or_else(|| GameError::ItemNotFound(item_name.trim().to_string()))?;
    let price = merchant.stock[idx].price;
    if player.gold < price {
        return Err(GameError::InsufficientFunds {
            needed: price,
            available: player.gold,
        });
    }
    player.add_item(merchant.stock[idx].item.clone())?;
    player.gold -= price;
    merchant.stock[idx].reduce_stock(1);
    let item_name = merchant.stock[idx].item.name.clone();
    if !merchant.stock[idx].in_stock() {
        merchant.stock.remove(idx);
    }
    info!("{} bought {} from {} for {}", player.name, item_name, merchant.name, price);
    Ok(Trade {
        item_name,
        gold: price,
    })
}

/// Sells one inventory item for half its value (10 gold when it has none).
/// Sold goods are not restocked.
pub fn sell(player: &mut Player, merchant: &Npc, item_name: &str) -> GameResult<Trade> {
    let idx = find_item(&player.inventory, item_name)
        .ok_or_else(|| GameError::ItemNotFound(item_name.trim().to_string()))?;
    let item = player.inventory.remove(idx);
    let gold = item.sell_price();
    player.gold += gold;
    info!("{} sold {} to {} for {}", player.name, item.name, merchant.name, gold);
    Ok(Trade {
        item_name: item.name,
        gold,
    })
}

/// List all items for sale
pub fn list_items(merchant: &Npc) -> Vec<&ShopEntry> {
    merchant.stock.iter().filter(|e| e.in_stock()).collect()
}

pub fn format_shop_listing(merchant: &Npc) -> String {
    let entries = list_items(merchant);
    if entries.is_empty() {
        return format!("{} has nothing in stock.", merchant.name);
    }
    let mut out = format!("{} - Items for Sale:", merchant.name);
    for e in entries {
        out.push_str(&format!("\n- {}: {} gold ({} left)", e.item, e.price, e.quantity));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::item::{crystal_shard, health_potion, iron_sword};
    use crate::game::types::CharacterClass;

    fn merchant() -> Npc {
        Npc::merchant(
            "Wandering Merchant",
            vec![
                ShopEntry::new(health_potion(), 50, 2),
                ShopEntry::new(iron_sword(), 100, 1),
            ],
        )
    }

    fn buyer(gold: u32) -> Player {
        let mut p = Player::new("Rook", CharacterClass::Knight, "Market");
        p.gold = gold;
        p
    }

    #[test]
    fn test_shop_entry_stock_management() {
        let mut entry = ShopEntry::new(health_potion(), 50, 3);
        assert!(entry.in_stock());
        assert_eq!(entry.reduce_stock(2), 2);
        assert_eq!(entry.reduce_stock(5), 1);
        assert!(!entry.in_stock());
    }

    #[test]
    fn test_buy_debits_exact_price_and_decrements() {
        let mut m = merchant();
        let mut p = buyer(120);
        let trade = buy(&mut p, &mut m, "health potion").unwrap();
        assert_eq!(trade.gold, 50);
        assert_eq!(p.gold, 70);
        assert_eq!(p.inventory.len(), 1);
        assert_eq!(m.stock[0].quantity, 1);
    }

    #[test]
    fn test_buy_last_unit_removes_entry() {
        let mut m = merchant();
        let mut p = buyer(500);
        buy(&mut p, &mut m, "Iron Sword").unwrap();
        assert!(m.stock.iter().all(|e| e.item.name != "Iron Sword"));
        assert_eq!(
            buy(&mut p, &mut m, "Iron Sword"),
            Err(GameError::ItemNotFound("Iron Sword".into()))
        );
        assert_eq!(p.gold, 400);
    }

    #[test]
    fn test_buy_insufficient_funds_changes_nothing() {
        let mut m = merchant();
        let mut p = buyer(99);
        let before = m.clone();
        assert_eq!(
            buy(&mut p, &mut m, "Iron Sword"),
            Err(GameError::InsufficientFunds {
                needed: 100,
                available: 99
            })
        );
        assert_eq!(p.gold, 99);
        assert!(p.inventory.is_empty());
        assert_eq!(m, before);
    }

    #[test]
    fn test_buy_with_full_pack_changes_nothing() {
        let mut m = merchant();
        let mut p = buyer(200).with_capacity(Some(0));
        assert_eq!(buy(&mut p, &mut m, "Health Potion"), Err(GameError::InventoryFull(0)));
        assert_eq!(p.gold, 200);
        assert_eq!(m.stock[0].quantity, 2);
    }

    #[test]
    fn test_sell_pays_half_or_flat() {
        let m = merchant();
        let mut p = buyer(0);
        p.add_item(iron_sword()).unwrap();
        p.add_item(crystal_shard()).unwrap();
        assert_eq!(sell(&mut p, &m, "iron sword").unwrap().gold, 50);
        assert_eq!(sell(&mut p, &m, "Crystal Shard").unwrap().gold, 10);
        assert_eq!(p.gold, 60);
        assert!(p.inventory.is_empty());
        assert_eq!(m.stock.len(), 2, "sold goods are not restocked");
    }

    #[test]
    fn test_sell_missing_item() {
        let m = merchant();
        let mut p = buyer(30);
        assert_eq!(
            sell(&mut p, &m, "Dragon Egg"),
            Err(GameError::ItemNotFound("Dragon Egg".into()))
        );
        assert_eq!(p.gold, 30);
    }

    #[test]
    fn test_listing_shows_prices() {
        let listing = format_shop_listing(&merchant());
        assert!(listing.contains("Health Potion: 50 gold (2 left)"));
        assert!(listing.contains("Iron Sword (+10 dmg): 100 gold"));
        let empty = Npc::merchant("Peddler", Vec::new());
        assert_eq!(format_shop_listing(&empty), "Peddler has nothing in stock.");
    }
}
