//! # Built-in Adapters
//!
//! Port implementations the runtime can supply on its own:
//!
//! - `InMemoryAddressBook` - default `AddressBook`
//! - `DnsSeeder` - default DNS `SeedSource`
//! - `SystemTimeSource` - wall-clock `TimeSource` for the DAG
//! - `ProcessExit` - production `FatalHandler`

pub mod address_book;
pub mod dns_seed;
pub mod fatal;
pub mod time;

pub use address_book::InMemoryAddressBook;
pub use dns_seed::{DnsSeeder, SubnetworkFilter};
pub use fatal::ProcessExit;
pub use time::SystemTimeSource;
