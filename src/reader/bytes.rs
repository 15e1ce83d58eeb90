use std::io::{BufRead, ErrorKind};

/// Splits a buffered stream into lines, accepting `\n`, `\r\n` and a lone `\r` as line
/// terminators. Terminators are never included in the returned line.
pub struct LineReader<R> {
    pub reader: R,
    // the previous line ended in '\r', so a leading '\n' belongs to it
    skip_lf: bool,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            skip_lf: false,
        }
    }

    /// Appends the next line to `buf`. Returns `Ok(false)` once the stream is exhausted and no
    /// further line was found.
    pub fn read_line(&mut self, buf: &mut Vec<u8>) -> std::io::Result<bool> {
        let mut read_any = false;
        loop {
            let (done, used) = {
                let available = match self.reader.fill_buf() {
                    Ok(n) => n,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                };

                if available.is_empty() {
                    return Ok(read_any);
                }

                let mut start = 0;
                if self.skip_lf {
                    self.skip_lf = false;
                    if available[0] == b'\n' {
                        start = 1;
                    }
                }

                let rest = &available[start..];
                match memchr::memchr2(b'\n', b'\r', rest) {
                    Some(i) => {
                        buf.extend_from_slice(&rest[..i]);
                        self.skip_lf = rest[i] == b'\r';
                        (true, start + i + 1)
                    }
                    None => {
                        buf.extend_from_slice(rest);
                        read_any |= !rest.is_empty();
                        (false, available.len())
                    }
                }
            };

            self.reader.consume(used);

            if done {
                return Ok(true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LineReader;
    use std::io::BufReader;

    fn lines(input: &[u8], capacity: usize) -> Vec<String> {
        let mut reader = LineReader::new(BufReader::with_capacity(capacity, input));
        let mut out = Vec::new();
        let mut buf = Vec::new();
        while reader.read_line(&mut buf).unwrap() {
            out.push(String::from_utf8(buf.clone()).unwrap());
            buf.clear();
        }
        out
    }

    #[test]
    fn all_line_endings() {
        let expected = vec!["a", "b", "c", "d"];
        assert_eq!(lines(b"a\nb\nc\nd\n", 64), expected);
        assert_eq!(lines(b"a\r\nb\r\nc\r\nd\r\n", 64), expected);
        assert_eq!(lines(b"a\rb\rc\rd\r", 64), expected);
        assert_eq!(lines(b"a\nb\r\nc\rd", 64), expected);
    }

    #[test]
    fn crlf_split_across_buffer_refills() {
        // a capacity of 2 forces "\r" and "\n" into separate fills
        assert_eq!(lines(b"a\r\nbc\r\nd", 2), vec!["a", "bc", "d"]);
    }

    #[test]
    fn blank_lines_are_kept() {
        assert_eq!(lines(b"a\n\nb\n", 64), vec!["a", "", "b"]);
        assert_eq!(lines(b"a\r\n\r\nb", 64), vec!["a", "", "b"]);
    }

    #[test]
    fn empty_input() {
        assert!(lines(b"", 64).is_empty());
    }
}
