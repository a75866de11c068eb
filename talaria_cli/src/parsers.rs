use talaria_optimizer::solver::recreate::{
    best_insertion::BestInsertionSortStrategy, recreate_strategy::RecreateStrategy,
};

/// Parses `best`, `best:<order>`, `regret` or `regret:<k>`.
pub fn parse_insertion(input: &str) -> Result<RecreateStrategy, String> {
    let (name, argument) = match input.split_once(':') {
        Some((name, argument)) => (name, Some(argument)),
        None => (input, None),
    };

    match (name, argument) {
        ("best", None) => Ok(RecreateStrategy::BestInsertion(
            BestInsertionSortStrategy::Random,
        )),
        ("best", Some(order)) => {
            let order = match order {
                "random" => BestInsertionSortStrategy::Random,
                "demand" => BestInsertionSortStrategy::Demand,
                "far" => BestInsertionSortStrategy::Far,
                "close" => BestInsertionSortStrategy::Close,
                _ => return Err(format!("Unknown insertion order {order}")),
            };
            Ok(RecreateStrategy::BestInsertion(order))
        }
        ("regret", None) => Ok(RecreateStrategy::RegretInsertion(2)),
        ("regret", Some(k)) => k
            .parse::<usize>()
            .ok()
            .filter(|&k| k >= 2)
            .map(RecreateStrategy::RegretInsertion)
            .ok_or_else(|| format!("Invalid regret level {k}")),
        _ => Err(String::from("Expected best or regret")),
    }
}
