use std::borrow::Cow;
use std::fs;
use std::io::{self, BufRead};
use std::{num, path::Path};

use log::debug;

use super::{builder::ObjMeshBuilder, meta::ParseOptions};

#[derive(thiserror::Error, Debug)]
pub enum ParserError {
    #[error("Failed to parse float: {0}")]
    ParseFloat(#[from] num::ParseFloatError),
    #[error("Failed to parse integer: {0}")]
    ParseInt(#[from] num::ParseIntError),
    #[error("Failed to read file: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse face `{0}`, expected 3 or 4 groups of `v/vt/vn` or `v//vn`")]
    ParseFace(String),
    #[error("Missing value in `{0}` statement")]
    MissingValue(&'static str),
    #[error("Index {index} out of range for {len} {kind}")]
    IndexOutOfRange {
        kind: &'static str,
        index: i64,
        len: usize,
    },
}

/// Where and why a scan stopped early.
#[derive(Debug)]
pub struct Truncation {
    /// 1-based line number of the offending line.
    pub line: usize,
    pub error: ParserError,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct ObjFaceIndex {
    pub(crate) vert_i: i64,
    pub(crate) uv_i: Option<i64>,
    pub(crate) normal_i: i64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct ObjFace {
    pub(crate) face_i: Vec<ObjFaceIndex>,
}

/// One recognized statement of an `.obj` file.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ObjLine<'a> {
    MaterialLibrary(&'a str),
    Object(&'a str),
    Position([f32; 3]),
    TextureCoordinate([f32; 2]),
    Normal([f32; 3]),
    UseMaterial(&'a str),
    Face(ObjFace),
    Comment(&'a str),
    Empty,
    Unsupported(&'a str),
}

// parses wavefront obj (https://en.wikipedia.org/wiki/Wavefront_.obj_file)
// stops at the first line it cannot make sense of and keeps what came before
pub(crate) fn parse(
    filepath: &Path,
    options: ParseOptions,
) -> Result<(ObjMeshBuilder, Option<Truncation>), ParserError> {
    let mut builder = ObjMeshBuilder::new(filepath, options);

    let lines = read_lines(filepath)?;
    log::info!("Loading mesh: {}", filepath.display());

    for (idx, line) in lines.enumerate() {
        let number = idx + 1;
        let result = line
            .map_err(ParserError::from)
            .and_then(|line| {
                debug!("Parsing: \"{}\"", line);
                builder.apply(parse_line(&line)?)
            });

        if let Err(error) = result {
            log::warn!(
                "Stopped parsing {} at line {}: {}",
                filepath.display(),
                number,
                error
            );
            return Ok((builder, Some(Truncation { line: number, error })));
        }
    }

    Ok((builder, None))
}

/// Splits off the statement keyword and parses its payload.
pub(crate) fn parse_line(line: &str) -> Result<ObjLine<'_>, ParserError> {
    let line = line.trim();
    let (token, value) = match line.split_once(char::is_whitespace) {
        Some((token, value)) => (token, value.trim()),
        None => (line, ""),
    };

    let parsed = match token {
        "" => ObjLine::Empty,
        token if token.starts_with('#') => ObjLine::Comment(line[1..].trim()),
        "mtllib" => ObjLine::MaterialLibrary(non_empty(value, "mtllib")?),
        "o" => ObjLine::Object(value),
        "v" => ObjLine::Position(parse_numbers(value, "v")?),
        "vt" => ObjLine::TextureCoordinate(parse_numbers(value, "vt")?),
        "vn" => ObjLine::Normal(parse_numbers(value, "vn")?),
        "usemtl" => ObjLine::UseMaterial(non_empty(value, "usemtl")?),
        "f" => ObjLine::Face(parse_face(value)?),
        _ => ObjLine::Unsupported(token),
    };

    Ok(parsed)
}

fn non_empty<'a>(value: &'a str, statement: &'static str) -> Result<&'a str, ParserError> {
    if value.is_empty() {
        Err(ParserError::MissingValue(statement))
    } else {
        Ok(value)
    }
}

// parses the first N numbers seperated by whitespace, trailing ones are ignored
pub(crate) fn parse_numbers<const N: usize>(
    value: &str,
    statement: &'static str,
) -> Result<[f32; N], ParserError> {
    let mut numbers = [0.0; N];
    let mut parts = value.split_whitespace();

    for number in numbers.iter_mut() {
        *number = parts
            .next()
            .ok_or(ParserError::MissingValue(statement))?
            .parse()?;
    }

    Ok(numbers)
}

// a triangle or quad whose groups either all carry a texture index or all omit it
fn parse_face(value: &str) -> Result<ObjFace, ParserError> {
    let face_i = value
        .split_whitespace()
        .map(|group| parse_face_index(group, value))
        .collect::<Result<Vec<_>, _>>()?;

    if !(3..=4).contains(&face_i.len()) {
        return Err(ParserError::ParseFace(value.into()));
    }

    let textured = face_i[0].uv_i.is_some();
    if face_i.iter().any(|index| index.uv_i.is_some() != textured) {
        return Err(ParserError::ParseFace(value.into()));
    }

    Ok(ObjFace { face_i })
}

// parses a single `v/vt/vn` or `v//vn` group
fn parse_face_index(group: &str, face: &str) -> Result<ObjFaceIndex, ParserError> {
    let [vert, uv, normal] = parse_triplet(group).ok_or_else(|| ParserError::ParseFace(face.into()))?;

    if vert.is_empty() || normal.is_empty() {
        return Err(ParserError::ParseFace(face.into()));
    }

    Ok(ObjFaceIndex {
        vert_i: vert.parse()?,
        uv_i: if uv.is_empty() { None } else { Some(uv.parse()?) },
        normal_i: normal.parse()?,
    })
}

// splits a triplet seperated by slashes, `None` unless there are exactly three parts
fn parse_triplet(value: &str) -> Option<[&str; 3]> {
    let mut parts = value.split('/');
    let triplet = [parts.next()?, parts.next()?, parts.next()?];

    if parts.next().is_some() {
        None
    } else {
        Some(triplet)
    }
}

// The output is wrapped in a Result to allow matching on errors
// Returns an Iterator over the lines of the file. Bytes that are not valid
// UTF-8 are replaced, only failing reads show up as errors.
pub(crate) fn read_lines<P>(
    filename: P,
) -> io::Result<impl Iterator<Item = io::Result<String>>>
where
    P: AsRef<Path>,
{
    let file = fs::File::open(filename)?;
    Ok(io::BufReader::new(file)
        .split(b'\n')
        .map(|line| line.map(|bytes| decode_line(&bytes))))
}

fn decode_line(bytes: &[u8]) -> String {
    let line = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = line {
        debug!("Replaced invalid UTF-8 in \"{}\"", line);
    }
    line.into_owned()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_line() -> Result<(), ParserError> {
        assert_eq!(parse_line("o foo bar")?, ObjLine::Object("foo bar"));
        assert_eq!(parse_line("mtllib  cube.mtl ")?, ObjLine::MaterialLibrary("cube.mtl"));
        assert_eq!(parse_line("usemtl Material.001")?, ObjLine::UseMaterial("Material.001"));
        assert_eq!(parse_line("v 1 2 3")?, ObjLine::Position([1.0, 2.0, 3.0]));
        assert_eq!(parse_line("v\t1 2 3 0.5 0.5 0.5")?, ObjLine::Position([1.0, 2.0, 3.0]));
        assert_eq!(parse_line("vt 0.25 0.75 0")?, ObjLine::TextureCoordinate([0.25, 0.75]));
        assert_eq!(parse_line("vn 0 0 -1")?, ObjLine::Normal([0.0, 0.0, -1.0]));
        assert_eq!(parse_line("# exported")?, ObjLine::Comment("exported"));
        assert_eq!(parse_line("#no space")?, ObjLine::Comment("no space"));
        assert_eq!(parse_line("   ")?, ObjLine::Empty);
        assert_eq!(parse_line("s off")?, ObjLine::Unsupported("s"));
        assert_eq!(parse_line("g group")?, ObjLine::Unsupported("g"));

        Ok(())
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(matches!(
            parse_line("v 1 2"),
            Err(ParserError::MissingValue("v"))
        ));
        assert!(matches!(
            parse_line("vn 1 x 2"),
            Err(ParserError::ParseFloat(_))
        ));
        assert!(matches!(
            parse_line("mtllib"),
            Err(ParserError::MissingValue("mtllib"))
        ));
    }

    #[test]
    fn test_parse_numbers() -> Result<(), ParserError> {
        assert_eq!(parse_numbers::<2>("1 -2.5e1", "vt")?, [1.0, -25.0]);
        assert_eq!(parse_numbers::<3>("  1   2 3  ", "v")?, [1.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn test_parse_face() -> Result<(), ParserError> {
        assert_eq!(
            parse_face("1/2/3 4/5/6 -1/-2/-3")?,
            ObjFace {
                face_i: vec![
                    ObjFaceIndex {
                        vert_i: 1,
                        uv_i: Some(2),
                        normal_i: 3,
                    },
                    ObjFaceIndex {
                        vert_i: 4,
                        uv_i: Some(5),
                        normal_i: 6,
                    },
                    ObjFaceIndex {
                        vert_i: -1,
                        uv_i: Some(-2),
                        normal_i: -3,
                    },
                ]
            }
        );

        let quad = parse_face("1//1 2//1 3//1 4//1")?;
        assert_eq!(quad.face_i.len(), 4);
        assert!(quad.face_i.iter().all(|index| index.uv_i.is_none()));

        Ok(())
    }

    #[test]
    fn test_parse_face_shapes() {
        for face in &[
            "1 2 3",
            "1/1 2/2 3/3",
            "1//1 2//1",
            "1//1 2//1 3//1 4//1 5//1",
            "1/1/1 2//1 3//1",
            "1/1/1/1 2/2/2 3/3/3",
            "/1/1 2/2/2 3/3/3",
        ] {
            assert!(
                matches!(parse_face(face), Err(ParserError::ParseFace(_))),
                "accepted `{}`",
                face
            );
        }

        assert!(matches!(
            parse_face("a/1/1 2/2/2 3/3/3"),
            Err(ParserError::ParseInt(_))
        ));
    }

    #[test]
    fn test_read_lines_replaces_invalid_utf8() -> Result<(), ParserError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("latin1.obj");
        fs::write(&path, b"# Cr\xe9\xe9 par Blender\r\no Tri\nv 0 0 0")?;

        let lines = read_lines(&path)?.collect::<Result<Vec<_>, _>>()?;
        assert_eq!(lines, vec!["# Cr\u{fffd}\u{fffd} par Blender\r", "o Tri", "v 0 0 0"]);
        assert_eq!(parse_line(&lines[0])?, ObjLine::Comment("Cr\u{fffd}\u{fffd} par Blender"));

        Ok(())
    }

    #[test]
    fn test_parse_triplet() {
        assert_eq!(parse_triplet("1/2/3"), Some(["1", "2", "3"]));
        assert_eq!(parse_triplet("1//3"), Some(["1", "", "3"]));
        assert_eq!(parse_triplet("1/3"), None);
        assert_eq!(parse_triplet("1"), None);
    }
}
