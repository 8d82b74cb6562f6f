//! Cron jobs for background voice maintenance.

pub mod voice_audit;
