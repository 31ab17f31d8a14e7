use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::event::Event;

use anyhow::{anyhow, Context, Result};
use log::debug;

/// Read all events from an LHEF or HepMC2 file, passing each one to `sink`
///
/// Returns the number of events read.
pub fn import<F>(filename: &Path, sink: F) -> Result<usize>
where
    F: FnMut(Event),
{
    let file = File::open(filename)
        .with_context(|| format!("Failed to open {:?}", filename))?;
    import_from(BufReader::new(file), sink)
        .with_context(|| format!("Failed to import {:?}", filename))
}

/// Read all events from a buffered reader, detecting the format
pub fn import_from<R, F>(mut reader: R, sink: F) -> Result<usize>
where
    R: BufRead,
    F: FnMut(Event),
{
    let buf = reader.fill_buf()?;

    if starts_with(buf, b"<LesHouchesEvents") {
        debug!("trying to import as LHEF");
        import_lhef(reader, sink)
    } else if starts_with(buf, b"HepMC") {
        debug!("trying to import as HepMC");
        import_hepmc(reader, sink)
    } else {
        Err(anyhow!("Unknown file format"))
    }
}

fn starts_with<T: std::cmp::PartialEq>(slice: &[T], prefix: &[T]) -> bool {
    if prefix.len() > slice.len() {
        return false;
    }
    &slice[..prefix.len()] == prefix
}

fn import_lhef<R: BufRead, F: FnMut(Event)>(
    reader: R,
    mut sink: F,
) -> Result<usize> {
    let mut reader = lhef::Reader::new(reader)
        .map_err(|err| anyhow!("Error construction LHEF reader: {}", err))?;
    let mut nevents = 0;
    while let Some(event) = reader
        .hepeup()
        .map_err(|err| anyhow!("Error reading LHEF event: {}", err))?
    {
        sink(Event::from(&event));
        nevents += 1;
    }
    Ok(nevents)
}

fn import_hepmc<R: BufRead, F: FnMut(Event)>(
    reader: R,
    mut sink: F,
) -> Result<usize> {
    let reader = hepmc2::reader::Reader::new(reader);
    let mut nevents = 0;
    for event in reader {
        let event = event
            .map_err(|err| anyhow!("Error reading HepMC event: {}", err))?;
        sink(Event::from(&event));
        nevents += 1;
    }
    Ok(nevents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unknown_format() {
        let input: &[u8] = b"this is not an event file\n";
        let res = import_from(input, |_| {});
        assert!(res.is_err());
    }

    const LHEF: &str = "<LesHouchesEvents version=\"1.0\">
<init>
2212 2212 6500 6500 0 0 0 0 3 1
1.0 0.1 1.0 1
</init>
<event>
4 1 2.5 91.2 0.0078 0.118
21 -1 0 0 501 502 0 0 100 100 0 0 9
21 -1 0 0 502 503 0 0 -100 100 0 0 9
21 1 1 2 501 504 30 0 10 31.6227766 0 0 9
21 1 1 2 504 503 -30 0 -10 31.6227766 0 0 9
</event>
<event>
3 1 1.0 -1 0.0078 0.118
2 -1 0 0 501 0 0 0 50 50 0 0 9
2 1 1 1 501 0 20 0 0 20 0 0 9
22 1 1 1 0 0 -20 0 0 20 0 0 9
</event>
</LesHouchesEvents>
";

    const HEPMC: &str = "HepMC::Version 2.06.09
HepMC::IO_GenEvent-START_EVENT_LISTING
E 1 -1 91.2 0.118 0.0078 0 -1 1 1 2 0 1 3.5
U GEV MM
V -1 0 0 0 0 0 2 3 0
P 1 2212 0 0 100 100 0.938 4 0 0 -1 0
P 2 2212 0 0 -100 100 0.938 4 0 0 -1 0
P 3 21 10 0 5 11.18 0 1 0 0 0 0
P 4 -2 -10 0 -5 11.18 0 1 0 0 0 0
P 5 23 0 0 0 91.2 91.2 2 0 0 0 0
E 2 -1 -1 0.118 0.0078 0 -1 1 1 2 0 0
U GEV MM
V -1 0 0 0 0 0 2 1 0
P 6 2212 0 0 100 100 0.938 4 0 0 -1 0
P 7 2212 0 0 -100 100 0.938 4 0 0 -1 0
P 8 22 0 20 0 20 0 1 0 0 0 0
HepMC::IO_GenEvent-END_EVENT_LISTING
";

    fn read_all(input: &str) -> Vec<Event> {
        let mut events = Vec::new();
        let nevents =
            import_from(input.as_bytes(), |ev| events.push(ev)).unwrap();
        assert_eq!(nevents, events.len());
        events
    }

    #[test]
    fn lhef() {
        let events = read_all(LHEF);
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].out.len(), 2);
        assert_eq!(events[0].weight, 2.5);
        assert_eq!(events[0].pt_hard, 91.2);
        assert_relative_eq!(events[0].out[0].pt, 30.);
        assert_relative_eq!(events[0].out[0].p[0], 31.6227766);

        assert_eq!(events[1].out.len(), 2);
        assert_eq!(events[1].weight, 1.);
        assert_eq!(events[1].pt_hard, 0.);
        assert_eq!(events[1].out[1].id.id(), 22);
    }

    #[test]
    fn hepmc() {
        let events = read_all(HEPMC);
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].out.len(), 2);
        assert_eq!(events[0].weight, 3.5);
        assert_eq!(events[0].pt_hard, 91.2);
        assert_eq!(events[0].out[1].id.id(), -2);
        assert_relative_eq!(events[0].out[1].pt, 10.);

        assert_eq!(events[1].out.len(), 1);
        assert_eq!(events[1].weight, 1.);
        assert_eq!(events[1].pt_hard, 0.);
    }

    #[test]
    fn prefix() {
        assert!(starts_with(b"HepMC::Version", b"HepMC"));
        assert!(!starts_with(b"Hep", b"HepMC"));
    }
}
