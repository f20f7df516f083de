use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::satellite::SatelliteKind;
use crate::sim::{Simulator, Stats};

/// Summary of a run, computed from the simulator's final state.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub frames: u64,
    pub simulated_seconds: f64,
    pub live: usize,
    pub defunct: usize,
    pub by_kind: BTreeMap<SatelliteKind, usize>,
    pub stats: Stats,
}

impl RunSummary {
    pub fn from_simulator(sim: &Simulator) -> Self {
        let mut by_kind = BTreeMap::new();
        let mut defunct = 0;
        for (_, s) in sim.iter() {
            *by_kind.entry(s.kind()).or_insert(0) += 1;
            if s.is_defunct() {
                defunct += 1;
            }
        }

        RunSummary {
            frames: sim.frame(),
            simulated_seconds: sim.frame() as f64 * sim.config().dt(),
            live: sim.len(),
            defunct,
            by_kind,
            stats: sim.stats(),
        }
    }
}

/// Write the run summary as JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &RunSummary) -> io::Result<()> {
    let s = &summary.stats;
    writeln!(writer, "{{")?;
    writeln!(writer, "  \"run\": {{")?;
    writeln!(writer, "    \"frames\": {},", summary.frames)?;
    writeln!(writer, "    \"simulated_s\": {:.1}", summary.simulated_seconds)?;
    writeln!(writer, "  }},")?;
    writeln!(writer, "  \"fleet\": {{")?;
    writeln!(writer, "    \"live\": {},", summary.live)?;
    writeln!(writer, "    \"defunct\": {},", summary.defunct)?;
    writeln!(writer, "    \"by_kind\": {{")?;
    let n = summary.by_kind.len();
    for (i, (kind, count)) in summary.by_kind.iter().enumerate() {
        let sep = if i + 1 < n { "," } else { "" };
        writeln!(writer, "      \"{}\": {}{}", kind, count, sep)?;
    }
    writeln!(writer, "    }}")?;
    writeln!(writer, "  }},")?;
    writeln!(writer, "  \"events\": {{")?;
    writeln!(writer, "    \"shots\": {},", s.shots)?;
    writeln!(writer, "    \"defunct\": {},", s.defunct)?;
    writeln!(writer, "    \"expired\": {},", s.expired)?;
    writeln!(writer, "    \"collisions\": {},", s.collisions)?;
    writeln!(writer, "    \"destroyed\": {},", s.destroyed)?;
    writeln!(writer, "    \"spawned\": {}", s.spawned)?;
    writeln!(writer, "  }}")?;
    writeln!(writer, "}}")?;
    Ok(())
}

/// Write the run summary JSON to a file.
pub fn write_summary_file(path: &str, summary: &RunSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::SimConfig;
    use crate::input::InputSnapshot;

    #[test]
    fn summary_counts_fleet() {
        let mut sim = Simulator::new(SimConfig { seed: Some(5), ..SimConfig::default() }).unwrap();
        sim.tick(&InputSnapshot::fire()).unwrap();
        let summary = RunSummary::from_simulator(&sim);
        assert_eq!(summary.frames, 1);
        assert!((summary.simulated_seconds - 48.0).abs() < 1e-9);
        assert_eq!(summary.by_kind[&SatelliteKind::Gps], 6);
        assert_eq!(summary.by_kind[&SatelliteKind::Projectile], 1);
        assert_eq!(summary.stats.shots, 1);
    }

    #[test]
    fn json_output_has_sections() {
        let sim = Simulator::new(SimConfig { seed: Some(5), ..SimConfig::default() }).unwrap();
        let summary = RunSummary::from_simulator(&sim);

        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let json = String::from_utf8(buf).unwrap();
        assert!(json.contains("\"run\""));
        assert!(json.contains("\"by_kind\""));
        assert!(json.contains("\"gps\": 6,"));
        assert!(json.contains("\"collisions\": 0"));
        assert!(!json.contains(",\n    }"), "no trailing comma in by_kind");
    }
}
