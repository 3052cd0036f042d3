pub mod item;
pub mod ticket;
pub mod views;

pub use item::TrackedItem;
pub use ticket::TrackedTicket;
pub use views::{ItemView, TicketView};
