use waterplan::{solve_allocation, InfeasiblePairSet, Source, User};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Units: demand/supply [m³/year], ppm [kg/m³], cost [$/m³]
    let users = vec![
        User::new("HH", 50.0, 0.5, 2.0),
        User::new("AGRO", 300.0, 1.0, 1.0),
        User::new("IND", 100.0, 0.7, 1.0),
        User::new("PG", 200.0, 1.0, 1.0),
    ];

    let sources = vec![
        Source::new("GW", 75.0, 0.2, 1.0, 5.0),
        Source::new("SW", 75.0, 0.1, 1.0, 1.0),
        Source::new("DW", 200.0, 0.7, 1.0, 2.0),
        Source::new("WW", 300.0, 1.0, 1.0, 3.0),
    ];

    // Groundwater and surface water may not be routed to power generation
    let infeasible_pairs = InfeasiblePairSet::new().with("GW", "PG").with("SW", "PG");

    let report = solve_allocation(users, sources, 1000.0, infeasible_pairs)?;
    println!("{report}");

    Ok(())
}
