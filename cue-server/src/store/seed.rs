//! 初始数据 - first-run seed values
//!
//! 新开业门店的默认配置: 12 张球桌、基础费率、四个常售商品。

use shared::{MenuCategory, MenuItem, RateTable, StockStatus, Table, TableType, Transaction};

use super::{BlobStore, StorageResult, RES_MENU, RES_RATES, RES_TABLES, RES_TRANSACTIONS};

/// 12 tables: 01-08 Pool, 09-10 Carom, 11-12 VIP
pub fn initial_tables() -> Vec<Table> {
    (1..=12)
        .map(|i| {
            let id = format!("{i:02}");
            let table_type = if i <= 8 {
                TableType::Pool
            } else if i <= 10 {
                TableType::Carom
            } else {
                TableType::Vip
            };
            let name = format!("Bàn {id}");
            Table::new(id, name, table_type)
        })
        .collect()
}

/// 默认费率（đồng/小时），15 分钟计费块
pub fn initial_rates() -> RateTable {
    RateTable {
        pool: 60000,
        carom: 50000,
        snooker: 80000,
        vip: 120000,
        billing_block: 15,
    }
}

pub fn initial_menu() -> Vec<MenuItem> {
    vec![
        MenuItem {
            id: "1".to_string(),
            name: "Sting Dâu".to_string(),
            price: 15000,
            category: MenuCategory::Drink,
            status: StockStatus::InStock,
            image: "https://picsum.photos/seed/sting/200".to_string(),
        },
        MenuItem {
            id: "2".to_string(),
            name: "Bò Húc".to_string(),
            price: 20000,
            category: MenuCategory::Drink,
            status: StockStatus::InStock,
            image: "https://picsum.photos/seed/redbull/200".to_string(),
        },
        MenuItem {
            id: "3".to_string(),
            name: "Mì Trứng".to_string(),
            price: 35000,
            category: MenuCategory::Food,
            status: StockStatus::InStock,
            image: "https://picsum.photos/seed/noodle/200".to_string(),
        },
        MenuItem {
            id: "4".to_string(),
            name: "Thuốc lá 555".to_string(),
            price: 35000,
            category: MenuCategory::Other,
            status: StockStatus::InStock,
            image: "https://picsum.photos/seed/cig/200".to_string(),
        },
    ]
}

/// 幂等初始化
///
/// Seeds every resource, but only when the table list has never been
/// written (or was written empty). Returns whether seeding happened.
pub fn seed_if_empty(store: &BlobStore) -> StorageResult<bool> {
    let existing: Option<Vec<Table>> = store.get(RES_TABLES)?;
    if existing.map(|tables| !tables.is_empty()).unwrap_or(false) {
        return Ok(false);
    }
    write_seed(store)?;
    Ok(true)
}

/// 覆写全部资源为初始值
pub fn write_seed(store: &BlobStore) -> StorageResult<()> {
    store.put(RES_TABLES, &initial_tables())?;
    store.put(RES_RATES, &initial_rates())?;
    store.put(RES_MENU, &initial_menu())?;
    store.put(RES_TRANSACTIONS, &Vec::<Transaction>::new())?;
    Ok(())
}
