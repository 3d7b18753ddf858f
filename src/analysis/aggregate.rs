use crate::error::{Error, Result};
use crate::models::{BoardKpi, GlobalKpi, KpiSummary, Solution};
use crate::storage::{Repository, Storage};

/// Tallies the AI and survey classifications of `solutions` independently.
pub fn aggregate(solutions: &[Solution]) -> KpiSummary {
    solutions.iter().fold(
        KpiSummary {
            total_solutions: solutions.len() as u32,
            ..KpiSummary::default()
        },
        |mut kpi, solution| {
            kpi.ai_analysis.record(solution.risk_ai);
            kpi.survey.record(solution.risk_survey);
            kpi
        },
    )
}

pub fn global_kpi(storage: &Storage) -> Result<GlobalKpi> {
    Ok(GlobalKpi {
        total_boards: storage.count_boards()?,
        summary: aggregate(&storage.list_all_solutions()?),
    })
}

pub fn board_kpi(repo: &dyn Repository, board_id: i64) -> Result<BoardKpi> {
    let board = repo
        .get_board(board_id)?
        .ok_or(Error::BoardNotFound(board_id))?;
    Ok(BoardKpi {
        board_name: board.name,
        summary: aggregate(&repo.list_solutions(board_id)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewSolution, RiskLevel, RiskStatus, UserRole};

    fn solution(risk_ai: RiskStatus, risk_survey: RiskStatus) -> Solution {
        Solution {
            id: 0,
            board_id: 1,
            name: "s".to_string(),
            description: "d".to_string(),
            user_role: UserRole::Unspecified,
            risk_survey,
            survey_details: None,
            risk_ai,
            ai_rationale: None,
        }
    }

    #[test]
    fn test_empty() {
        let kpi = aggregate(&[]);
        assert_eq!(kpi.total_solutions, 0);
        assert_eq!(kpi.ai_analysis.total(), 0);
    }

    #[test]
    fn test_axes_are_counted_independently() {
        use RiskLevel::*;
        let solutions = vec![
            solution(High.into(), Limited.into()),
            solution(High.into(), RiskStatus::Pending),
            solution(Unacceptable.into(), Unacceptable.into()),
            solution(RiskStatus::Error, Minimal.into()),
            solution(RiskStatus::Pending, Minimal.into()),
            solution(Minimal.into(), RiskStatus::Pending),
        ];

        let kpi = aggregate(&solutions);

        assert_eq!(kpi.total_solutions, 6);
        assert_eq!(kpi.ai_analysis.high, 2);
        assert_eq!(kpi.ai_analysis.unacceptable, 1);
        assert_eq!(kpi.ai_analysis.limited, 0);
        assert_eq!(kpi.ai_analysis.minimal, 1);
        assert_eq!(kpi.ai_analysis.pending, 1);
        assert_eq!(kpi.ai_analysis.error, 1);
        assert_eq!(kpi.ai_analysis.classified(), 4);

        assert_eq!(kpi.survey.high, 0);
        assert_eq!(kpi.survey.limited, 1);
        assert_eq!(kpi.survey.minimal, 2);
        assert_eq!(kpi.survey.unacceptable, 1);
        assert_eq!(kpi.survey.pending, 2);

        for axis in [kpi.ai_analysis, kpi.survey] {
            assert_eq!(axis.total(), kpi.total_solutions);
            assert!(axis.classified() <= kpi.total_solutions);
        }
    }

    #[test]
    fn test_json_shape() {
        let kpi = aggregate(&[solution(RiskLevel::High.into(), RiskStatus::Pending)]);
        let value = serde_json::to_value(&kpi).unwrap();
        assert_eq!(value["total_solutions"], 1);
        assert_eq!(value["ai_analysis"]["high"], 1);
        assert_eq!(value["survey"]["pending"], 1);
    }

    #[test]
    fn test_scoped_kpis_carry_board_context() {
        let storage = Storage::in_memory().unwrap();
        let retail = storage.create_board("Retail AI").unwrap();
        storage.create_board("Empty").unwrap();
        let solution = NewSolution::new("HR Screener", "CV ranking", None).unwrap();
        storage.create_solution(retail.id, &solution).unwrap();

        let global = serde_json::to_value(global_kpi(&storage).unwrap()).unwrap();
        assert_eq!(global["total_boards"], 2);
        assert_eq!(global["total_solutions"], 1);
        assert_eq!(global["ai_analysis"]["pending"], 1);

        let board = serde_json::to_value(board_kpi(&storage, retail.id).unwrap()).unwrap();
        assert_eq!(board["board_name"], "Retail AI");
        assert_eq!(board["total_solutions"], 1);
        assert_eq!(board["survey"]["pending"], 1);

        let err = board_kpi(&storage, 999).unwrap_err();
        assert!(matches!(err, Error::BoardNotFound(999)));
    }
}
