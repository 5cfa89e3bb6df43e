pub mod dates;
pub mod inventory;
pub mod product;
pub mod stats;

pub use dates::ExpiryWindow;
pub use inventory::{CreateInventory, DateRange, DateRangeParams, InventoryRecord};
pub use product::ProductRecord;
pub use stats::{
    CategoryStock, CategoryStockWithData, ExpiredCount, JoinedRecord, NearlyExpiredCount, TagTotal,
    TotalInventory, TotalInventoryValue,
};
