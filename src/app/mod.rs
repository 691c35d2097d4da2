mod record;
mod replay;

pub(crate) use record::run_record;
pub(crate) use replay::{ReplayPlan, run_replay};
