//! Auction Item Entity

use std::collections::BTreeMap;

use kernel::contract::{AuctionItem, AuctionSaleItem};
use kernel::id::{ItemId, UserId};
use serde::{Deserialize, Serialize};

/// Open auction item with its current leader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionItemRecord {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
    pub highest_bid: i32,
    pub seller_id: UserId,
    pub highest_bidder_id: Option<UserId>,
}

impl AuctionItemRecord {
    pub fn new(item_id: ItemId, seller_id: UserId, item: AuctionSaleItem) -> Self {
        Self {
            item_id,
            name: item.name,
            description: item.description,
            highest_bid: 0,
            seller_id,
            highest_bidder_id: None,
        }
    }

    /// Accept the bid iff it beats the current highest
    pub fn place_bid(&mut self, bidder_id: UserId, price: i32) -> bool {
        if price <= self.highest_bid {
            return false;
        }
        self.highest_bid = price;
        self.highest_bidder_id = Some(bidder_id);
        true
    }
}

impl From<&AuctionItemRecord> for AuctionItem {
    fn from(record: &AuctionItemRecord) -> Self {
        Self {
            item_id: record.item_id,
            name: record.name.clone(),
            description: record.description.clone(),
            highest_bid: record.highest_bid,
            seller_id: record.seller_id,
        }
    }
}

/// Open items indexed by ID; serialized as a list ordered by ID
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<AuctionItemRecord>", into = "Vec<AuctionItemRecord>")]
pub struct ItemTable {
    items: BTreeMap<ItemId, AuctionItemRecord>,
}

impl ItemTable {
    pub fn insert(&mut self, record: AuctionItemRecord) {
        self.items.insert(record.item_id, record);
    }

    pub fn get(&self, item_id: ItemId) -> Option<&AuctionItemRecord> {
        self.items.get(&item_id)
    }

    pub fn get_mut(&mut self, item_id: ItemId) -> Option<&mut AuctionItemRecord> {
        self.items.get_mut(&item_id)
    }

    pub fn remove(&mut self, item_id: ItemId) -> Option<AuctionItemRecord> {
        self.items.remove(&item_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuctionItemRecord> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<AuctionItemRecord>> for ItemTable {
    fn from(records: Vec<AuctionItemRecord>) -> Self {
        Self {
            items: records.into_iter().map(|r| (r.item_id, r)).collect(),
        }
    }
}

impl From<ItemTable> for Vec<AuctionItemRecord> {
    fn from(table: ItemTable) -> Self {
        table.items.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vase() -> AuctionItemRecord {
        AuctionItemRecord::new(
            ItemId::first(),
            UserId::first(),
            AuctionSaleItem {
                name: "Vase".to_string(),
                description: "Ming".to_string(),
            },
        )
    }

    #[test]
    fn test_bid_must_beat_highest() {
        let mut item = vase();
        assert!(item.place_bid(UserId::new(2), 50));
        assert!(!item.place_bid(UserId::new(3), 40));
        assert!(!item.place_bid(UserId::new(3), 50));
        assert_eq!(item.highest_bid, 50);
        assert_eq!(item.highest_bidder_id, Some(UserId::new(2)));
    }

    #[test]
    fn test_non_positive_first_bid_rejected() {
        let mut item = vase();
        assert!(!item.place_bid(UserId::new(2), 0));
        assert!(!item.place_bid(UserId::new(2), -5));
        assert_eq!(item.highest_bidder_id, None);
    }

    #[test]
    fn test_wire_view_hides_bidder() {
        let mut item = vase();
        item.place_bid(UserId::new(2), 10);
        let view = AuctionItem::from(&item);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["highestBid"], 10);
        assert!(json.get("highestBidderId").is_none());
    }

    #[test]
    fn test_item_table_list_serialization() {
        let mut table = ItemTable::default();
        table.insert(vase());
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json[0]["itemId"], 1);

        let parsed: ItemTable = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, table);
    }
}
