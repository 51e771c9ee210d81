// handlers/protected/mod.rs - Endpoints behind the bearer-token gate
//
// Every handler here can rely on an `AuthKader` in the request extensions.

pub mod kader;
pub mod laporan;
pub mod lookup;
pub mod resource;

pub use kader::{kader_put, me_get, password_put};
pub use laporan::laporan_get;
pub use lookup::{anak_simple, ibu_simple, master_imunisasi_simple};
