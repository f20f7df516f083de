use std::io::{self, Write};

use crate::physics::altitude;
use crate::sim::Simulator;

/// Write the current fleet as CSV, one row per satellite.
///
/// Columns: frame, handle, kind, pos_x, pos_y, vel_x, vel_y, altitude_km,
///          speed, flight_path_deg, angle_deg, radius, age, defunct
pub fn write_fleet<W: Write>(writer: &mut W, sim: &Simulator) -> io::Result<()> {
    writeln!(
        writer,
        "frame,handle,kind,pos_x,pos_y,vel_x,vel_y,altitude_km,\
         speed,flight_path_deg,angle_deg,radius,age,defunct"
    )?;

    for (handle, s) in sim.iter() {
        let k = s.kinematics();
        writeln!(
            writer,
            "{},{},{},{:.1},{:.1},{:.3},{:.3},{:.3},\
             {:.3},{:.2},{:.2},{:.1},{},{}",
            sim.frame(),
            handle,
            s.kind(),
            k.pos.x, k.pos.y,
            k.vel.x, k.vel.y,
            altitude(&k.pos) / 1000.0,
            k.speed(),
            k.flight_path_angle().to_degrees(),
            k.angle.to_degrees(),
            s.radius(),
            s.age(),
            s.is_defunct(),
        )?;
    }

    Ok(())
}

/// Write the fleet CSV to a file at the given path.
pub fn write_fleet_file(path: &str, sim: &Simulator) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_fleet(&mut file, sim)
}
