//! Python bindings for the ly2mei library using PyO3

use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::convert::{
    ConversionSettings, IdStrategy, convert_ly_to_mei as rust_convert_ly_to_mei,
    convert_mei_to_ly as rust_convert_mei_to_ly, ly_to_mei as rust_ly_to_mei,
};
use crate::file::LyFile as RustLyFile;
use crate::mei::write_mei;
use crate::parser::LyParser;
use crate::whitelist::Whitelist;

pyo3::create_exception!(ly2mei, ParseError, PyValueError);
pyo3::create_exception!(ly2mei, ConversionError, PyRuntimeError);

fn settings(strict: bool, sequential_ids: bool) -> ConversionSettings {
    ConversionSettings {
        whitelist: if strict {
            Whitelist::strict()
        } else {
            Whitelist::extended()
        },
        ids: if sequential_ids {
            IdStrategy::Sequential
        } else {
            IdStrategy::Uuid
        },
        ..ConversionSettings::default()
    }
}

/// Parsed LilyPond measures
#[pyclass(name = "LyFile")]
#[derive(Clone)]
pub struct PyLyFile {
    inner: RustLyFile,
}

#[pymethods]
impl PyLyFile {
    #[new]
    fn new() -> Self {
        PyLyFile {
            inner: RustLyFile::new(),
        }
    }

    #[staticmethod]
    #[pyo3(signature = (content, strict=false))]
    fn parse(content: &str, strict: bool) -> PyResult<Self> {
        let parser = LyParser::with_whitelist(settings(strict, false).whitelist);
        match parser.parse(content) {
            Ok(file) => Ok(PyLyFile { inner: file }),
            Err(e) => Err(ParseError::new_err(format!("Failed to parse LilyPond: {}", e))),
        }
    }

    #[staticmethod]
    #[pyo3(signature = (path, strict=false))]
    fn from_file(path: &str, strict: bool) -> PyResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PyIOError::new_err(format!("Failed to read file '{}': {}", path, e)))?;
        Self::parse(&content, strict)
    }

    #[staticmethod]
    fn from_mei(content: &str) -> PyResult<Self> {
        match rust_convert_mei_to_ly(content) {
            Ok(file) => Ok(PyLyFile { inner: file }),
            Err(e) => Err(ConversionError::new_err(format!("{:#}", e))),
        }
    }

    #[pyo3(signature = (title=None, sequential_ids=false))]
    fn to_mei(&self, title: Option<String>, sequential_ids: bool) -> PyResult<String> {
        let mut settings = settings(false, sequential_ids);
        settings.mei.title = title;
        let mut ids = settings.ids.generator();
        let document = rust_ly_to_mei(&self.inner, &settings.mei, ids.as_mut());
        write_mei(&document, settings.indent)
            .map_err(|e| ConversionError::new_err(format!("Failed to write MEI: {}", e)))
    }

    fn save(&self, path: &str) -> PyResult<()> {
        std::fs::write(path, self.inner.to_string())
            .map_err(|e| PyIOError::new_err(format!("Failed to write file '{}': {}", path, e)))
    }

    #[getter]
    fn measure_count(&self) -> usize {
        self.inner.measures.len()
    }

    #[getter]
    fn note_count(&self) -> usize {
        self.inner.note_count()
    }

    fn __len__(&self) -> usize {
        self.inner.event_count()
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "LyFile(measures={}, events={})",
            self.measure_count(),
            self.__len__()
        )
    }
}

/// Convert LilyPond source to an MEI document
///
/// Raises ParseError if the input uses syntax outside the whitelist.
#[pyfunction]
#[pyo3(signature = (content, strict=false, sequential_ids=false))]
fn ly_to_mei(content: &str, strict: bool, sequential_ids: bool) -> PyResult<String> {
    rust_convert_ly_to_mei(content, &settings(strict, sequential_ids))
        .map_err(|e| ParseError::new_err(format!("{:#}", e)))
}

/// Convert an MEI document to LilyPond source
#[pyfunction]
fn mei_to_ly(content: &str) -> PyResult<String> {
    PyLyFile::from_mei(content).map(|file| file.inner.to_string())
}

/// Parse LilyPond source
#[pyfunction]
#[pyo3(signature = (content, strict=false))]
fn parse(content: &str, strict: bool) -> PyResult<PyLyFile> {
    PyLyFile::parse(content, strict)
}

/// LilyPond to MEI converter
///
/// Example:
///     xml = ly2mei.ly_to_mei("a4( b'16 c,,2)")
///     print(ly2mei.mei_to_ly(xml))
#[pymodule]
fn ly2mei(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyLyFile>()?;
    m.add_function(wrap_pyfunction!(ly_to_mei, m)?)?;
    m.add_function(wrap_pyfunction!(mei_to_ly, m)?)?;
    m.add_function(wrap_pyfunction!(parse, m)?)?;

    m.add("ParseError", m.py().get_type::<ParseError>())?;
    m.add("ConversionError", m.py().get_type::<ConversionError>())?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
