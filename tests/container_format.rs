use srcpress::{
    chunk_count, compress, decompress, decompress_chunk, Algorithm, ContainerHeader, Error,
    CHUNK_SIZE, HEADER_SIZE,
};

fn compressed_bytes(container: &[u8]) -> usize {
    u32::from_le_bytes(container[0..4].try_into().expect("slice length")) as usize
}

fn table_start(container: &[u8]) -> usize {
    (HEADER_SIZE + compressed_bytes(container) + 3) & !3
}

fn offsets(container: &[u8]) -> Vec<u32> {
    container[table_start(container)..]
        .chunks_exact(4)
        .map(|word| u32::from_le_bytes(word.try_into().expect("slice length")))
        .collect()
}

fn sample_input(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[test]
fn offset_table_is_strictly_increasing_and_bounded() {
    let input = sample_input(200_000);
    for algorithm in [Algorithm::Deflate, Algorithm::Zstd] {
        let container = compress(&input, algorithm, 0).expect("compress");
        let table = offsets(&container);
        assert_eq!(table.len(), chunk_count(input.len()));
        assert!(table[0] as usize > HEADER_SIZE);
        for pair in table.windows(2) {
            assert!(pair[0] < pair[1], "offsets must strictly increase");
        }
        let last = *table.last().expect("nonempty table") as usize;
        assert_eq!(last, HEADER_SIZE + compressed_bytes(&container));
    }
}

#[test]
fn padding_between_payload_and_table_is_zero() {
    // Odd payload sizes land on unaligned boundaries; check them all.
    for len in 1..=32usize {
        let input = sample_input(len);
        let container = compress(&input, Algorithm::Deflate, 0).expect("compress");
        let payload_end = HEADER_SIZE + compressed_bytes(&container);
        let padding = &container[payload_end..table_start(&container)];
        assert!(padding.iter().all(|&b| b == 0), "nonzero padding for len {len}");
    }
}

#[test]
fn header_records_constructor_arguments() {
    let input = sample_input(50_000);
    let container = compress(&input, Algorithm::Zstd, 19).expect("compress");
    let header = ContainerHeader::parse(&container).expect("parse");
    assert_eq!(header.algorithm, Algorithm::Zstd);
    assert_eq!(header.level, 19);
    assert_eq!(
        container.len(),
        table_start(&container) + 4 * chunk_count(input.len()),
    );

    let container = compress(&input, Algorithm::Deflate, 5).expect("compress");
    let header = ContainerHeader::parse(&container).expect("parse");
    assert_eq!(header.algorithm, Algorithm::Deflate);
    assert_eq!(header.level, 5);
}

#[test]
fn truncated_containers_are_rejected() {
    let input = sample_input(10_000);
    let container = compress(&input, Algorithm::Deflate, 0).expect("compress");

    match decompress(&container[..7], input.len()) {
        Err(Error::Truncated(_)) => {}
        other => panic!("expected truncation error, got {other:?}"),
    }
    // Header intact but payload cut short.
    match decompress(&container[..HEADER_SIZE + 2], input.len()) {
        Err(Error::Truncated(_)) => {}
        other => panic!("expected truncation error, got {other:?}"),
    }
    // Offset table cut off.
    match decompress_chunk(&container[..container.len() - 4], 0, CHUNK_SIZE.min(input.len())) {
        Err(Error::Truncated(_)) => {}
        other => panic!("expected truncation error, got {other:?}"),
    }
}

#[test]
fn chunk_index_past_table_is_rejected() {
    let input = sample_input(10_000);
    let container = compress(&input, Algorithm::Zstd, 0).expect("compress");
    match decompress_chunk(&container, 1, 10) {
        Err(Error::Truncated(_)) => {}
        other => panic!("expected truncation error, got {other:?}"),
    }
}

#[test]
fn corrupt_offset_table_is_rejected() {
    let input = sample_input(10_000);
    let container = compress(&input, Algorithm::Deflate, 0).expect("compress");
    let at = table_start(&container);

    // First offset points before the payload start.
    let mut mangled = container.clone();
    mangled[at..at + 4].copy_from_slice(&4u32.to_le_bytes());
    match decompress_chunk(&mangled, 0, input.len()) {
        Err(Error::Corrupt(_)) => {}
        other => panic!("expected corruption error, got {other:?}"),
    }

    // First offset points past the payload end.
    let mut mangled = container.clone();
    let past = (HEADER_SIZE + compressed_bytes(&container) + 1) as u32;
    mangled[at..at + 4].copy_from_slice(&past.to_le_bytes());
    match decompress_chunk(&mangled, 0, input.len()) {
        Err(Error::Corrupt(_)) => {}
        other => panic!("expected corruption error, got {other:?}"),
    }
}

#[test]
fn wrong_chunk_output_size_is_rejected() {
    let input = sample_input(3 * CHUNK_SIZE);
    for algorithm in [Algorithm::Deflate, Algorithm::Zstd] {
        let container = compress(&input, algorithm, 0).expect("compress");
        match decompress_chunk(&container, 0, CHUNK_SIZE - 1) {
            Err(Error::Corrupt(_)) => {}
            other => panic!("expected corruption error, got {other:?}"),
        }
        match decompress_chunk(&container, 1, 100) {
            Err(Error::Corrupt(_)) => {}
            other => panic!("expected corruption error, got {other:?}"),
        }
    }
}
