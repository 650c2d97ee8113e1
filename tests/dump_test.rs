mod common;

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use common::{noisy_trajectory, noisy_trajectory_sequences, small_split_args, to_records, MMSI};
use seqmaker::{
    dump::{
        dump_diffs, dump_sequences, read_diff_pairs, read_points, sequence_path, write_run_args,
        ARGS_FILE_NAME,
    },
    mmsi_counter::count_mmsi,
    FormatPolicy, Sequencer,
};

fn scratch_dir(name: &str) -> Utf8PathBuf {
    let dir = std::env::temp_dir().join(format!("seqmaker-{name}-{}", std::process::id()));
    let dir = Utf8PathBuf::from_path_buf(dir).expect("temp dir is not UTF-8");
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_sequence_files_round_trip() {
    let dir = scratch_dir("sequences");
    let args = small_split_args();

    let mut sequencer = Sequencer::new(args);
    sequencer.add_trajectory(MMSI, noisy_trajectory());
    let sequences = sequencer.make_sequences(true).unwrap();

    write_run_args(&dir, ", ", &args, true).unwrap();
    assert_eq!(dump_sequences(&dir, &sequences).unwrap(), 1);

    let path = sequence_path(&dir, MMSI);
    assert_eq!(path.file_name(), Some("200000000.bin"));

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 4 * args.grid_points() * 8);
    assert_eq!(read_points(&bytes), noisy_trajectory_sequences());

    let recorded = fs::read_to_string(dir.join(ARGS_FILE_NAME)).unwrap();
    assert!(recorded.starts_with("-d ,  -N 5 -t 15 -s "));
    assert!(recorded.ends_with(&format!("-i 5 -v 0 -l -p \"{dir}\"\n")));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_diff_file_round_trip() {
    let dir = scratch_dir("diffs");
    fs::create_dir_all(&dir).unwrap();
    let file = dir.join("dump.bin");

    let input = to_records(MMSI, 1456786800, &noisy_trajectory()[..4]);
    let mut sequencer = Sequencer::new(small_split_args());
    sequencer
        .ingest(input.as_bytes(), ", ", FormatPolicy::FailFast)
        .unwrap();

    let diffs = sequencer.diffs(1).unwrap();
    assert_eq!(diffs.len(), 3);
    assert_eq!(
        diffs.iter().map(|(dt, _)| *dt).collect::<Vec<_>>(),
        vec![10, 1, 9]
    );

    dump_diffs(&file, &diffs).unwrap();
    assert_eq!(read_diff_pairs(&fs::read(&file).unwrap()), diffs);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_count_mmsi_over_records() {
    let mut input = to_records(MMSI, 1456786800, &noisy_trajectory());
    input.push_str(&to_records(MMSI + 7, 1456786800, &noisy_trajectory()[..3]));
    input.push_str(&to_records(42, 1456786800, &noisy_trajectory()[..3]));

    let counts = count_mmsi(input.as_bytes(), ", ", FormatPolicy::FailFast).unwrap();
    assert_eq!(
        counts,
        vec![(MMSI, noisy_trajectory().len()), (42, 3), (MMSI + 7, 3)]
    );
}

#[test]
fn test_sequence_path_layout() {
    assert_eq!(
        sequence_path(Utf8Path::new("out"), 211234567),
        Utf8Path::new("out/211234567.bin")
    );
}
