mod common;

use common::{knight_session, quiet_rules, session_with};
use mystic_realms::config::GameConfig;
use mystic_realms::game::{CharacterClass, Direction, GameError};

#[test]
fn buy_then_sell_a_potion() {
    let mut s = knight_session();
    let listing = s.shop_listing().unwrap();
    assert!(listing.starts_with("Wandering Merchant - Items for Sale:"));
    assert!(listing.contains("Health Potion: 50 gold (5 left)"));

    assert_eq!(s.buy("health potion").unwrap(), "You bought Health Potion for 50 gold.");
    assert_eq!(s.player().unwrap().gold, 0);
    assert!(s.shop_listing().unwrap().contains("Health Potion: 50 gold (4 left)"));

    assert_eq!(
        s.buy("Health Potion"),
        Err(GameError::InsufficientFunds {
            needed: 50,
            available: 0
        })
    );

    assert_eq!(s.sell("Health Potion").unwrap(), "You sold Health Potion for 25 gold.");
    let player = s.player().unwrap();
    assert_eq!(player.gold, 25);
    assert!(player.inventory.is_empty());
}

#[test]
fn failed_sale_keeps_gold() {
    let mut s = knight_session();
    assert_eq!(
        s.sell("Dragon Scale"),
        Err(GameError::ItemNotFound("Dragon Scale".into()))
    );
    assert_eq!(s.player().unwrap().gold, 50);
}

#[test]
fn only_merchants_trade() {
    let mut s = knight_session();
    s.move_player(Direction::South).unwrap();
    assert_eq!(s.buy("Health Potion"), Err(GameError::NoMerchant));
    assert_eq!(s.shop_listing(), Err(GameError::NoMerchant));
}

#[test]
fn the_only_staff_sells_out() {
    let mut s = session_with(quiet_rules(), CharacterClass::Mage);
    s.player_mut().unwrap().gold = 400;
    s.buy("Magic Staff").unwrap();
    assert_eq!(s.buy("Magic Staff"), Err(GameError::ItemNotFound("Magic Staff".into())));
    assert!(!s.shop_listing().unwrap().contains("Magic Staff"));
    assert_eq!(s.player().unwrap().gold, 250);
}

#[test]
fn configured_capacity_blocks_purchase() {
    let config = GameConfig {
        inventory_capacity: Some(1),
        ..quiet_rules()
    };
    let mut s = session_with(config, CharacterClass::Mage);
    s.pick_up("Ancient Scroll").unwrap();
    assert_eq!(s.buy("Health Potion"), Err(GameError::InventoryFull(1)));
    assert_eq!(s.player().unwrap().gold, 75);
    assert!(s.shop_listing().unwrap().contains("(5 left)"));
}
