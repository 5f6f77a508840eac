#![no_main]

use libfuzzer_sys::fuzz_target;

use astar::algorithms::astar::AStarSearch;
use astar::algorithms::astar::SearchStatus;
use astar::grid::Grid;
use astar::heuristic::Manhattan;

fuzz_target!(|data: &[u8]| {
    let Ok(layout) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(grid) = Grid::try_from(layout) else {
        return;
    };
    let Ok(mut search) = AStarSearch::<Manhattan>::new(grid) else {
        return;
    };

    let cells = search.grid().cell_count();
    let status = search.run().unwrap();
    assert!(search.stats().steps <= cells + 1);
    match status {
        SearchStatus::Succeeded => {
            let path = search.solution().unwrap();
            assert!(path.valid_in(search.grid()));
            assert!(path.is_simple());
        }
        SearchStatus::Failed => assert!(search.solution().is_none()),
        SearchStatus::Running => unreachable!(),
    }
});
