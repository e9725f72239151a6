use std::io::{BufRead, Write};

use super::Point2;

/// Counts gathered while reading a vertex stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadSummary {
    /// Number of valid `x y` lines in the stream, including those that did
    /// not fit in the buffer.
    pub points: usize,
    /// Number of lines that did not parse as two numbers.
    pub skipped: usize,
}

/// Reads `x y` pairs, one per line, into `buf`.
///
/// Lines that do not start with two finite numbers are skipped. Tokens after
/// the first two are ignored, and so is text glued to the end of the second
/// number (`1 2;` reads as `(1, 2)`). At most `buf.len()` points are stored,
/// but the returned count covers the whole stream, so a first call with an
/// empty buffer can size the allocation for a second call.
///
/// # Errors
///
/// Returns any I/O error raised by the underlying reader.
pub fn read_into<R: BufRead>(reader: R, buf: &mut [Point2]) -> std::io::Result<ReadSummary> {
    scan(reader, |index, point| {
        if let Some(slot) = buf.get_mut(index) {
            *slot = point;
        }
    })
}

/// Reads every `x y` pair of a stream into a new vector.
///
/// Accepts the same lines as [`read_into`].
///
/// # Errors
///
/// Returns any I/O error raised by the underlying reader.
pub fn read<R: BufRead>(reader: R) -> std::io::Result<(Vec<Point2>, ReadSummary)> {
    let mut points = Vec::new();
    let summary = scan(reader, |_, point| points.push(point))?;
    Ok((points, summary))
}

/// Hands every parsed point to `sink` along with its index in the stream.
fn scan<R, F>(reader: R, mut sink: F) -> std::io::Result<ReadSummary>
where
    R: BufRead,
    F: FnMut(usize, Point2),
{
    let mut summary = ReadSummary::default();

    for line in reader.lines() {
        let line = line?;
        match parse_pair(&line) {
            Some(point) => {
                sink(summary.points, point);
                summary.points += 1;
            }
            None => summary.skipped += 1,
        }
    }

    tracing::debug!(
        points = summary.points,
        skipped = summary.skipped,
        "read polygon vertices"
    );
    Ok(summary)
}

/// Writes one vertex per line with 6 significant digits.
///
/// # Errors
///
/// Returns any I/O error raised by the writer.
pub fn write<W: Write>(mut writer: W, points: &[Point2]) -> std::io::Result<()> {
    for p in points {
        writeln!(
            writer,
            "{:>12}  {:>12}",
            format_significant(p.x, 6),
            format_significant(p.y, 6)
        )?;
    }
    Ok(())
}

fn parse_pair(line: &str) -> Option<Point2> {
    let mut tokens = line.split_whitespace();
    let x: f64 = tokens.next()?.parse().ok()?;
    let y = leading_number(tokens.next()?)?;
    (x.is_finite() && y.is_finite()).then(|| Point2::new(x, y))
}

/// Parses the longest prefix of `token` that is a number.
fn leading_number(token: &str) -> Option<f64> {
    (1..=token.len())
        .rev()
        .filter(|&end| token.is_char_boundary(end))
        .find_map(|end| token[..end].parse().ok())
}

/// Formats `value` with `digits` significant digits, dropping trailing zeros
/// and switching to exponent notation (`1.25e-05`) for very large or small
/// magnitudes.
fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }

    let precision = digits.max(1);
    // round first so that 9.999999 lands in the next decade
    let rounded: f64 = format!("{:.*e}", precision - 1, value)
        .parse()
        .unwrap_or(value);
    #[allow(clippy::cast_possible_truncation)]
    let exponent = rounded.abs().log10().floor() as i32;

    #[allow(clippy::cast_possible_wrap)]
    let limit = precision as i32;
    if exponent < -4 || exponent >= limit {
        let text = format!("{:.*e}", precision - 1, value);
        match text.split_once('e') {
            Some((mantissa, exp)) => match exp.parse::<i32>() {
                // at least two exponent digits, always signed
                Ok(e) => {
                    let sign = if e < 0 { '-' } else { '+' };
                    format!("{}e{sign}{:02}", trim_fraction(mantissa), e.abs())
                }
                Err(_) => text,
            },
            None => text,
        }
    } else {
        #[allow(clippy::cast_sign_loss)]
        let decimals = (limit - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    const BOUNDARY: &str = "\
% cell outline
0 0
4.5 0

4.5 3  extra tokens are ignored
not a point
0 3
1.0
";

    #[test]
    fn read_counts_and_skips() {
        let (points, summary) = read(Cursor::new(BOUNDARY)).unwrap();
        assert_eq!(summary, ReadSummary { points: 4, skipped: 4 });
        assert_eq!(points.len(), 4);
        assert_eq!(points[2], Point2::new(4.5, 3.0));
    }

    #[test]
    fn read_into_reports_full_count() {
        let summary = read_into(Cursor::new(BOUNDARY), &mut []).unwrap();
        assert_eq!(summary.points, 4);

        let mut buf = vec![Point2::origin(); 2];
        let summary = read_into(Cursor::new(BOUNDARY), &mut buf).unwrap();
        assert_eq!(summary.points, 4);
        assert_eq!(buf, vec![Point2::new(0.0, 0.0), Point2::new(4.5, 0.0)]);
    }

    #[test]
    fn read_into_two_pass() {
        let count = read_into(Cursor::new(BOUNDARY), &mut []).unwrap().points;
        let mut buf = vec![Point2::origin(); count];
        read_into(Cursor::new(BOUNDARY), &mut buf).unwrap();
        assert_eq!(buf[3], Point2::new(0.0, 3.0));
    }

    #[test]
    fn read_rejects_non_finite() {
        let (points, summary) = read(Cursor::new("inf 0\n1 NaN\n2 2\n")).unwrap();
        assert_eq!(points, vec![Point2::new(2.0, 2.0)]);
        assert_eq!(summary.skipped, 2);
    }

    #[test]
    fn read_ignores_text_after_second_number() {
        let (points, summary) = read(Cursor::new("1 2;\n3 4#corner\n5 ;6\n7x 8\n")).unwrap();
        assert_eq!(points, vec![Point2::new(1.0, 2.0), Point2::new(3.0, 4.0)]);
        assert_eq!(summary, ReadSummary { points: 2, skipped: 2 });
    }

    #[test]
    fn read_and_read_into_agree() {
        let (points, summary) = read(Cursor::new(BOUNDARY)).unwrap();
        let mut buf = vec![Point2::origin(); summary.points];
        assert_eq!(read_into(Cursor::new(BOUNDARY), &mut buf).unwrap(), summary);
        assert_eq!(buf, points);
    }

    #[test]
    fn write_layout() {
        let mut out = Vec::new();
        write(&mut out, &[Point2::new(1.5, -2.0)]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "         1.5            -2\n");
    }

    #[test]
    fn format_six_significant_digits() {
        assert_eq!(format_significant(0.0, 6), "0");
        assert_eq!(format_significant(3.141_592_653, 6), "3.14159");
        assert_eq!(format_significant(-12.5, 6), "-12.5");
        assert_eq!(format_significant(123_456.7, 6), "123457");
        assert_eq!(format_significant(1_234_567.0, 6), "1.23457e+06");
        assert_eq!(format_significant(0.000_012_5, 6), "1.25e-05");
        assert_eq!(format_significant(-2.0e120, 6), "-2e+120");
        assert_eq!(format_significant(9.999_999_9, 6), "10");
    }

    #[test]
    fn write_then_read_round_trip() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.25, -3.5),
            Point2::new(2.718_281_828, 7.0),
        ];
        let mut out = Vec::new();
        write(&mut out, &points).unwrap();

        let (back, summary) = read(Cursor::new(out)).unwrap();
        assert_eq!(summary.skipped, 0);
        assert_eq!(back.len(), points.len());
        for (a, b) in points.iter().zip(&back) {
            assert_relative_eq!(a, b, max_relative = 1e-6);
        }
    }
}
