//! Ordered cascade deletion plans.
//!
//! Foreign keys in the schema are plain NO ACTION references, so deleting an
//! aggregate root means deleting its dependents first, leaves inward. Each
//! aggregate's order lives here as a static [`CascadePlan`]; a single
//! executor runs any plan inside the caller's transaction. Adding a table to
//! an aggregate means adding one step to its plan, not another hand-written
//! delete function.

use crate::db::errors::{DbError, Result};
use sqlx::PgConnection;
use tracing::{debug, instrument};

/// One dependent-table delete within a cascade. `sql` takes the root id as
/// its only parameter.
#[derive(Debug, Clone, Copy)]
pub struct CascadeStep {
    /// Name reported in [`DbError::CascadeFailed`] when this step errors
    pub stage: &'static str,
    pub sql: &'static str,
}

/// The full deletion order for one aggregate root. Steps run first, in
/// order, then the root row itself.
#[derive(Debug, Clone, Copy)]
pub struct CascadePlan {
    pub root: &'static str,
    pub root_sql: &'static str,
    pub steps: &'static [CascadeStep],
}

impl CascadePlan {
    /// Run every step and then the root delete on the given connection.
    ///
    /// The caller owns the transaction: commit on `Ok`, drop to roll back on
    /// `Err`. Returns [`DbError::NotFound`] when the root row does not exist,
    /// so a bad id never commits the dependent deletes.
    #[instrument(skip(self, conn), fields(root = self.root), err)]
    pub async fn execute(&self, conn: &mut PgConnection, id: i64) -> Result<()> {
        for step in self.steps {
            let result = sqlx::query(step.sql)
                .bind(id)
                .execute(&mut *conn)
                .await
                .map_err(|e| DbError::CascadeFailed {
                    stage: step.stage,
                    source: e.into(),
                })?;
            debug!(stage = step.stage, rows = result.rows_affected(), "Cascade step complete");
        }

        let result = sqlx::query(self.root_sql)
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| DbError::CascadeFailed {
                stage: self.root,
                source: e.into(),
            })?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        Ok(())
    }
}

/// Region is the widest aggregate: sensors (and their readings), alerts (and
/// their notifications), resources (and their change history), and devices
/// (with status logs and maintenance records) all hang off it.
pub static REGION: CascadePlan = CascadePlan {
    root: "regions",
    root_sql: "DELETE FROM regions WHERE id = $1",
    steps: &[
        CascadeStep {
            stage: "sensor_readings",
            sql: "DELETE FROM sensor_readings WHERE sensor_id IN (SELECT id FROM sensors WHERE region_id = $1)",
        },
        CascadeStep {
            stage: "sensors",
            sql: "DELETE FROM sensors WHERE region_id = $1",
        },
        CascadeStep {
            stage: "notifications",
            sql: "DELETE FROM notifications WHERE alert_id IN (SELECT id FROM alerts WHERE region_id = $1)",
        },
        CascadeStep {
            stage: "alerts",
            sql: "DELETE FROM alerts WHERE region_id = $1",
        },
        CascadeStep {
            stage: "resource_changes",
            sql: "DELETE FROM resource_changes WHERE resource_id IN (SELECT id FROM resources WHERE region_id = $1)",
        },
        CascadeStep {
            stage: "resources",
            sql: "DELETE FROM resources WHERE region_id = $1",
        },
        CascadeStep {
            stage: "maintenance_records",
            sql: "DELETE FROM maintenance_records WHERE device_id IN (SELECT id FROM devices WHERE install_region_id = $1)",
        },
        CascadeStep {
            stage: "device_status_logs",
            sql: "DELETE FROM device_status_logs WHERE device_id IN (SELECT id FROM devices WHERE install_region_id = $1)",
        },
        CascadeStep {
            stage: "devices",
            sql: "DELETE FROM devices WHERE install_region_id = $1",
        },
    ],
};

pub static DEVICE: CascadePlan = CascadePlan {
    root: "devices",
    root_sql: "DELETE FROM devices WHERE id = $1",
    steps: &[
        CascadeStep {
            stage: "maintenance_records",
            sql: "DELETE FROM maintenance_records WHERE device_id = $1",
        },
        CascadeStep {
            stage: "device_status_logs",
            sql: "DELETE FROM device_status_logs WHERE device_id = $1",
        },
    ],
};

pub static SENSOR: CascadePlan = CascadePlan {
    root: "sensors",
    root_sql: "DELETE FROM sensors WHERE id = $1",
    steps: &[CascadeStep {
        stage: "sensor_readings",
        sql: "DELETE FROM sensor_readings WHERE sensor_id = $1",
    }],
};

pub static ALERT_RULE: CascadePlan = CascadePlan {
    root: "alert_rules",
    root_sql: "DELETE FROM alert_rules WHERE id = $1",
    steps: &[
        CascadeStep {
            stage: "notifications",
            sql: "DELETE FROM notifications WHERE alert_id IN (SELECT id FROM alerts WHERE rule_id = $1)",
        },
        CascadeStep {
            stage: "alerts",
            sql: "DELETE FROM alerts WHERE rule_id = $1",
        },
    ],
};

pub static ALERT: CascadePlan = CascadePlan {
    root: "alerts",
    root_sql: "DELETE FROM alerts WHERE id = $1",
    steps: &[CascadeStep {
        stage: "notifications",
        sql: "DELETE FROM notifications WHERE alert_id = $1",
    }],
};

pub static RESOURCE: CascadePlan = CascadePlan {
    root: "resources",
    root_sql: "DELETE FROM resources WHERE id = $1",
    steps: &[CascadeStep {
        stage: "resource_changes",
        sql: "DELETE FROM resource_changes WHERE resource_id = $1",
    }],
};

#[cfg(test)]
mod tests {
    use super::*;

    /// A step that references another dependent table via a subquery must run
    /// before the step that empties that table.
    fn assert_runs_before(plan: &CascadePlan, earlier: &str, later: &str) {
        let pos = |stage: &str| {
            plan.steps
                .iter()
                .position(|s| s.stage == stage)
                .unwrap_or_else(|| panic!("{} missing {}", plan.root, stage))
        };
        assert!(pos(earlier) < pos(later), "{earlier} must precede {later}");
    }

    #[test]
    fn test_region_plan_deletes_leaves_first() {
        assert_runs_before(&REGION, "sensor_readings", "sensors");
        assert_runs_before(&REGION, "notifications", "alerts");
        assert_runs_before(&REGION, "resource_changes", "resources");
        assert_runs_before(&REGION, "maintenance_records", "devices");
        assert_runs_before(&REGION, "device_status_logs", "devices");
    }

    #[test]
    fn test_alert_rule_plan_deletes_leaves_first() {
        assert_runs_before(&ALERT_RULE, "notifications", "alerts");
    }

    #[test]
    fn test_stage_names_are_unique_within_each_plan() {
        for plan in [&REGION, &DEVICE, &SENSOR, &ALERT_RULE, &ALERT, &RESOURCE] {
            let mut stages: Vec<_> = plan.steps.iter().map(|s| s.stage).collect();
            stages.sort_unstable();
            stages.dedup();
            assert_eq!(stages.len(), plan.steps.len(), "{}", plan.root);
        }
    }
}
