use anyhow::Result;
use clap::Parser;
use client_core::{driver_session, http_client, TripLifecycle, TransferLifecycle};

#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    server_url: String,
    #[arg(long)]
    driver_id: i64,
    #[arg(long)]
    username: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let client = http_client(
        args.server_url,
        driver_session(args.driver_id, args.username),
    );
    client.load_driver_context().await?;
    let snapshot = client.snapshot().await;

    match &snapshot.truck {
        Some(truck) => {
            println!(
                "Truck #{} [{:?}, {:?}] capacity={:?}kg",
                truck.truck_id.0, truck.status, truck.kind, truck.load_capacity_kg
            );
        }
        None => {
            println!("No truck assigned to driver {}", client.session().user_id.0);
            return Ok(());
        }
    }

    match &snapshot.active_trip {
        Some(trip) => {
            println!("Active trip #{}: {:?}", trip.trip_id.0, trip.status);
            for control in TripLifecycle::offered_controls(trip.status) {
                println!("  [{}] -> {:?}", control.label, control.target);
            }
        }
        None => println!("No active trip"),
    }

    match (&snapshot.active_transfer, &snapshot.transfer_route) {
        (Some(transfer), Some(route)) => {
            println!(
                "Active transfer #{}: {:?} ({} -> {})",
                transfer.transfer_id.0, transfer.status, route.origin, route.destination
            );
            for control in TransferLifecycle::offered_controls(transfer.status) {
                println!("  [{}] -> {:?}", control.label, control.target);
            }
        }
        _ => println!("No active transfer"),
    }

    Ok(())
}
