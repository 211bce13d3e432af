//! Notice records and their validation.

mod notice;
mod validator;

pub use notice::NoticeRecord;
pub use validator::FieldKind;
pub use validator::FieldRule;
pub use validator::RecordSchema;
pub use validator::RecordValidator;
pub use validator::ValidatedPage;
