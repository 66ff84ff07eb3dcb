pub mod stage1_load;
pub mod stage2_lift;
pub mod stage3_report;
