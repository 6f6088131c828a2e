//! Fixture builders shared by the engine integration tests

#![allow(dead_code)]

pub const UMR_WIDTH: usize = 500;
pub const CLAIMS_WIDTH: usize = 1251;
pub const FILE_DATE: &str = "20250429";

/// Space-filled line of `width` chars with `values` placed at 1-based positions
pub fn fixed_line(width: usize, values: &[(usize, &str)]) -> String {
    let mut buffer = vec![' '; width];
    for (from, value) in values {
        for (offset, c) in value.chars().enumerate() {
            buffer[from - 1 + offset] = c;
        }
    }
    buffer.into_iter().collect()
}

pub fn umr_header(date: &str) -> String {
    let name = format!("UMR_ACCUM_{}", date);
    fixed_line(UMR_WIDTH, &[(1, "1"), (3, &name), (33, date), (41, "120000")])
}

pub fn umr_detail(member_id: &str, gender: &str) -> String {
    fixed_line(
        UMR_WIDTH,
        &[
            (1, "2"),
            (3, member_id),
            (20, "JANE"),
            (46, "DOE"),
            (81, "19800101"),
            (104, gender),
            (105, "EE"),
        ],
    )
}

pub fn umr_trailer(date: &str, count: &str) -> String {
    let name = format!("UMR_ACCUM_{}", date);
    fixed_line(
        UMR_WIDTH,
        &[(1, "3"), (3, &name), (33, date), (41, "120000"), (67, count)],
    )
}

/// Header, `details`, trailer declaring `count`, newline-joined
pub fn umr_file(details: &[String], count: &str) -> String {
    let mut lines = vec![umr_header(FILE_DATE)];
    lines.extend(details.iter().cloned());
    lines.push(umr_trailer(FILE_DATE, count));
    lines.join("\n")
}

pub fn claims_line(account: &str) -> String {
    fixed_line(
        CLAIMS_WIDTH,
        &[(1, "00000000000000000001"), (21, "P"), (82, account), (177, "20250101")],
    )
}
