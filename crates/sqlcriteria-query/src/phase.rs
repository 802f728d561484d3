//! Fixed clause sequences shared by the statement builders.
//!
//! A builder names its clauses as a phase enum and renders one phase at a
//! time; [`PhasedRenderer::render`] walks them in the declared order, so clause
//! order never depends on which clauses happen to be populated.

use crate::prepared::PreparedSqlBuilder;
use sqlcriteria_core::Result;
use std::fmt::Debug;

/// SELECT clauses, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectPhase {
    Select,
    From,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Limit,
    Offset,
    ForUpdate,
}

impl SelectPhase {
    /// Rendering order.
    pub const ORDER: &'static [SelectPhase] = &[
        SelectPhase::Select,
        SelectPhase::From,
        SelectPhase::Where,
        SelectPhase::GroupBy,
        SelectPhase::Having,
        SelectPhase::OrderBy,
        SelectPhase::Limit,
        SelectPhase::Offset,
        SelectPhase::ForUpdate,
    ];
}

/// Criteria UPDATE clauses, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePhase {
    Update,
    Set,
    From,
    Where,
}

impl UpdatePhase {
    /// Rendering order.
    pub const ORDER: &'static [UpdatePhase] = &[
        UpdatePhase::Update,
        UpdatePhase::Set,
        UpdatePhase::From,
        UpdatePhase::Where,
    ];
}

/// Criteria DELETE clauses, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePhase {
    Delete,
    Where,
}

impl DeletePhase {
    /// Rendering order.
    pub const ORDER: &'static [DeletePhase] = &[DeletePhase::Delete, DeletePhase::Where];
}

/// INSERT clauses, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPhase {
    Into,
    Values,
}

impl InsertPhase {
    /// Rendering order.
    pub const ORDER: &'static [InsertPhase] = &[InsertPhase::Into, InsertPhase::Values];
}

/// A statement renderer driven by a fixed phase sequence.
pub(crate) trait PhasedRenderer {
    type Phase: Copy + Debug + 'static;

    /// Phases in rendering order.
    const ORDER: &'static [Self::Phase];

    /// Render one clause; a phase whose source is empty writes nothing.
    fn render_phase(&self, phase: Self::Phase, sql: &mut PreparedSqlBuilder) -> Result<()>;

    fn render(&self, sql: &mut PreparedSqlBuilder) -> Result<()> {
        for &phase in Self::ORDER {
            tracing::trace!(?phase, "Rendering phase");
            self.render_phase(phase, sql)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::prepared::{SqlKind, SqlLogType};

    struct Recorder;

    impl PhasedRenderer for Recorder {
        type Phase = DeletePhase;
        const ORDER: &'static [DeletePhase] = DeletePhase::ORDER;

        fn render_phase(&self, phase: DeletePhase, sql: &mut PreparedSqlBuilder) -> Result<()> {
            sql.append_sql(&format!("[{:?}]", phase));
            Ok(())
        }
    }

    #[test]
    fn test_phases_run_in_declared_order() {
        let mut sql = PreparedSqlBuilder::new(SqlKind::Delete, Dialect::Standard, SqlLogType::None);
        Recorder.render(&mut sql).unwrap();
        assert_eq!(sql.sql(), "[Delete][Where]");
    }

    #[test]
    fn test_select_order_is_fixed() {
        assert_eq!(SelectPhase::ORDER.first(), Some(&SelectPhase::Select));
        assert_eq!(SelectPhase::ORDER.last(), Some(&SelectPhase::ForUpdate));
        assert_eq!(SelectPhase::ORDER.len(), 9);
    }
}
