use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dispatcher::Dispatcher;
use crate::error::DispatchResult;
use crate::scenario::params::ScenarioParams;
use crate::spatial::{GridInfo, Location};

/// Uniform random point inside the grid.
pub fn random_location<R: Rng>(rng: &mut R, grid: GridInfo) -> Location {
    Location::new(
        rng.gen_range(0..grid.width.max(1)) as i64,
        rng.gen_range(0..grid.height.max(1)) as i64,
    )
}

/// Random dropoff that differs from `pickup`.
pub fn random_destination<R: Rng>(rng: &mut R, grid: GridInfo, pickup: Location) -> Location {
    // A 1x1 grid has nowhere else to go.
    if grid.width.max(1) as u64 * grid.height.max(1) as u64 <= 1 {
        return pickup;
    }
    loop {
        let candidate = random_location(rng, grid);
        if candidate != pickup {
            return candidate;
        }
    }
}

/// Seeds the dispatcher with drivers and riders at random grid points, then
/// has every rider request a ride from where they stand.
///
/// Identifiers are `driver_NNNN`, `rider_NNNN` and `ride_NNNN`; the same seed
/// always produces the same world.
pub fn build_scenario(dispatcher: &mut Dispatcher, params: ScenarioParams) -> DispatchResult<()> {
    let grid = dispatcher.grid_info();
    let mut rng = StdRng::seed_from_u64(params.seed);

    for i in 0..params.num_drivers {
        let location = random_location(&mut rng, grid);
        dispatcher.create_driver(format!("driver_{i:04}"), location)?;
    }

    for i in 0..params.num_riders {
        let pickup = random_location(&mut rng, grid);
        let dropoff = random_destination(&mut rng, grid, pickup);
        let rider_id = format!("rider_{i:04}");
        dispatcher.create_rider(rider_id.clone(), pickup)?;
        dispatcher.request_ride(format!("ride_{i:04}"), rider_id, pickup, dropoff)?;
    }
    Ok(())
}
