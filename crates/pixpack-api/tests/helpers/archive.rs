//! ZIP response helpers.

use std::io::{Cursor, Read};

use zip::ZipArchive;

/// Archive entries as `(name, contents)`, in archive order.
pub fn read_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).expect("Response is not a ZIP");
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).expect("Failed to open ZIP entry");
            let mut data = Vec::new();
            file.read_to_end(&mut data)
                .expect("Failed to read ZIP entry");
            (file.name().to_string(), data)
        })
        .collect()
}

pub fn entry_names(bytes: &[u8]) -> Vec<String> {
    read_entries(bytes).into_iter().map(|(name, _)| name).collect()
}
