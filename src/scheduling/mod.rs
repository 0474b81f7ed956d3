//! Meeting scheduling core: derived status, grid geometry, drag-to-reschedule,
//! the two-phase commit and view composition. Nothing here draws or blocks.

pub mod commit;
pub mod composer;
pub mod drag;
pub mod status;
pub mod time_grid;

pub use commit::{CommitError, CommitReceipt, RescheduleCommitter};
pub use composer::{CalendarView, CalendarViewComposer, ConfirmPrompt};
pub use drag::{DropOutcome, DropRejection, HoverCell, PendingReschedule, RescheduleController};
pub use status::{resolve_status, MeetingStatus};
