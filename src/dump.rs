//! # Output files
//!
//! Binary and text dumps of handler results. All binary formats are headerless
//! concatenations of little-endian fixed-size records.
//!
//! Formats
//! -----------------
//! * **Sequence file** `<dir>/<mmsi>.bin` – `(i32 latitude, i32 longitude)` per grid point,
//!   in AIS units (1/10000 minute). One file per vessel holds all its sequences back to back.
//! * **Diff file** – `(u32 Δt, i32 Δx)` per pair, Δt in seconds, Δx in 1/10000 nm.
//! * **`args.txt`** – one line recording the parameters of the last sequence run, e.g.
//!   `-d ", " -N 360 -t 50 -s 0.5 -i 10 -v 0 -l -p "out"`.
//! * **Drop-rate report** – CSV with header `mmsi,drop_rate`, one row per vessel in
//!   ascending MMSI order.
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
};

use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use serde::Serialize;

use crate::{
    ais::Point,
    constants::Mmsi,
    seqmaker_errors::SeqMakerError,
    sequencer::{DiffPair, DropRateMap, SequenceMap},
    split_args::SplitArgs,
};

/// Name of the parameter record written next to the sequence files.
pub const ARGS_FILE_NAME: &str = "args.txt";

/// Size in bytes of one encoded point or diff pair.
pub const RECORD_SIZE: usize = 8;

/// Write `points` as consecutive little-endian `(i32, i32)` pairs.
pub fn write_points<W: Write>(mut writer: W, points: &[Point]) -> Result<(), SeqMakerError> {
    for p in points {
        writer.write_all(&p.latitude.to_le_bytes())?;
        writer.write_all(&p.longitude.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `diffs` as consecutive little-endian `(u32, i32)` pairs.
pub fn write_diff_pairs<W: Write>(mut writer: W, diffs: &[DiffPair]) -> Result<(), SeqMakerError> {
    for (dt, dx) in diffs {
        writer.write_all(&dt.to_le_bytes())?;
        writer.write_all(&dx.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Decode a sequence file body. Trailing bytes that do not form a full record are ignored.
pub fn read_points(bytes: &[u8]) -> Vec<Point> {
    bytes
        .chunks_exact(RECORD_SIZE)
        .map(|rec| {
            let (lat, lon) = rec.split_at(4);
            Point::new(
                i32::from_le_bytes([lat[0], lat[1], lat[2], lat[3]]),
                i32::from_le_bytes([lon[0], lon[1], lon[2], lon[3]]),
            )
        })
        .collect()
}

/// Decode a diff file body. Trailing bytes that do not form a full record are ignored.
pub fn read_diff_pairs(bytes: &[u8]) -> Vec<DiffPair> {
    bytes
        .chunks_exact(RECORD_SIZE)
        .map(|rec| {
            let (dt, dx) = rec.split_at(4);
            (
                u32::from_le_bytes([dt[0], dt[1], dt[2], dt[3]]),
                i32::from_le_bytes([dx[0], dx[1], dx[2], dx[3]]),
            )
        })
        .collect()
}

/// Path of the sequence file of `mmsi` under `dir`.
pub fn sequence_path(dir: &Utf8Path, mmsi: Mmsi) -> Utf8PathBuf {
    dir.join(format!("{mmsi}.bin"))
}

/// Write one `<mmsi>.bin` file per vessel into `dir`, creating `dir` if needed.
///
/// Return
/// ----------
/// * The number of files written.
pub fn dump_sequences(dir: &Utf8Path, sequences: &SequenceMap) -> Result<usize, SeqMakerError> {
    create_dir(dir)?;

    for (mmsi, seq) in sequences.iter().sorted_unstable_by_key(|(mmsi, _)| **mmsi) {
        let file = File::create(sequence_path(dir, *mmsi))?;
        write_points(BufWriter::new(file), seq)?;
    }
    Ok(sequences.len())
}

/// Write `diffs` to the file at `path`.
pub fn dump_diffs(path: &Utf8Path, diffs: &[DiffPair]) -> Result<(), SeqMakerError> {
    let file = File::create(path)?;
    write_diff_pairs(BufWriter::new(file), diffs)
}

/// Render the parameter line of `args.txt`.
///
/// `delimiter` is recorded as given on the command line, before unescaping.
pub fn format_run_args(
    delimiter: &str,
    args: &SplitArgs,
    apply_low_pass_filter: bool,
    dir: &Utf8Path,
) -> String {
    let lpf = if apply_low_pass_filter { "-l " } else { "" };
    format!(
        "-d {delimiter} -N {} -t {} -s {} -i {} -v {} {lpf}-p \"{dir}\"",
        args.seq_length, args.dt_max, args.ds_max, args.dti, args.v_min
    )
}

/// Write `args.txt` into `dir`, creating `dir` if needed.
pub fn write_run_args(
    dir: &Utf8Path,
    delimiter: &str,
    args: &SplitArgs,
    apply_low_pass_filter: bool,
) -> Result<(), SeqMakerError> {
    create_dir(dir)?;
    let mut file = BufWriter::new(File::create(dir.join(ARGS_FILE_NAME))?);
    writeln!(
        file,
        "{}",
        format_run_args(delimiter, args, apply_low_pass_filter, dir)
    )?;
    file.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct DropRateRow {
    mmsi: Mmsi,
    drop_rate: f64,
}

/// Write a `mmsi,drop_rate` CSV report, rows in ascending MMSI order.
pub fn write_drop_rates<W: Write>(writer: W, drop_rates: &DropRateMap) -> Result<(), SeqMakerError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (&mmsi, &drop_rate) in drop_rates.iter().sorted_unstable_by_key(|(mmsi, _)| **mmsi) {
        csv_writer.serialize(DropRateRow { mmsi, drop_rate })?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn create_dir(dir: &Utf8Path) -> Result<(), SeqMakerError> {
    if !dir.as_str().is_empty() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod dump_test {
    use super::*;

    #[test]
    fn test_point_encoding_layout() {
        let mut bytes = Vec::new();
        write_points(&mut bytes, &[Point::new(1, -1)]).unwrap();
        assert_eq!(bytes, [1, 0, 0, 0, 0xff, 0xff, 0xff, 0xff]);

        bytes.push(7);
        assert_eq!(read_points(&bytes), vec![Point::new(1, -1)]);
    }

    #[test]
    fn test_diff_encoding_layout() {
        let mut bytes = Vec::new();
        write_diff_pairs(&mut bytes, &[(256, 2)]).unwrap();
        assert_eq!(bytes, [0, 1, 0, 0, 2, 0, 0, 0]);
        assert_eq!(read_diff_pairs(&bytes), vec![(256, 2)]);
    }

    #[test]
    fn test_format_run_args() {
        let args = SplitArgs {
            seq_length: 360,
            dt_max: 50,
            dti: 10,
            ds_max: 0.5,
            v_min: 0.,
        };
        let dir = Utf8Path::new("out");

        assert_eq!(
            format_run_args("\", \"", &args, true, dir),
            "-d \", \" -N 360 -t 50 -s 0.5 -i 10 -v 0 -l -p \"out\""
        );
        assert_eq!(
            format_run_args(";", &args, false, dir),
            "-d ; -N 360 -t 50 -s 0.5 -i 10 -v 0 -p \"out\""
        );
    }

    #[test]
    fn test_drop_rate_report() {
        let mut rates = DropRateMap::default();
        rates.insert(300000000, 0.25);
        rates.insert(200000000, 1.0);

        let mut out = Vec::new();
        write_drop_rates(&mut out, &rates).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "mmsi,drop_rate\n200000000,1.0\n300000000,0.25\n"
        );
    }
}
