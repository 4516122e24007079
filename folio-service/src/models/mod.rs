//! Domain models for folio-service.

mod custom_field;
mod folio;
mod folio_window;
mod invoice;
mod workspace;

pub use custom_field::CustomFieldDef;
pub use folio::{Folio, FolioStatus, FolioSummary};
pub use folio_window::{FolioWindow, UpsertAction, UpsertFolioWindow, WindowUpsert};
pub use invoice::{Invoice, LineItem, Payment};
pub use workspace::WorkspaceDef;
