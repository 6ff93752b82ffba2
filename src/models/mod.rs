pub mod customer;
pub mod menu_item;
pub mod order;
pub mod order_item;

pub use customer::{Customer, NewCustomer};
pub use menu_item::MenuItem;
pub use order::{NewOrder, Order, OrderStatus};
pub use order_item::{NewOrderItem, OrderItem};
