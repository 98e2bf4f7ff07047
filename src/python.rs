//! Python bindings for the PReg codec using PyO3.
//!
//! This module provides Python-friendly wrappers around the core Rust
//! types: `loads` parses `bytes` into a policy document and `dumps`
//! serializes one back to `bytes`.

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyList};

use crate::{PolicyData, PolicyError, PolicyFile, PolicyInstruction, PolicyRegType, PregParser};

/// Convert a Rust PolicyError to a Python exception.
fn policy_error_to_py(err: PolicyError) -> PyErr {
    match err {
        PolicyError::Io(e) => PyIOError::new_err(e.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

/// Python wrapper for PolicyInstruction.
#[pyclass(name = "PolicyInstruction")]
#[derive(Clone)]
pub struct PyPolicyInstruction {
    inner: PolicyInstruction,
}

#[pymethods]
impl PyPolicyInstruction {
    /// Build a validated instruction from Python values.
    ///
    /// `data` must match the value type: `str` for the text types,
    /// `list[str]` for the list types, `bytes` for REG_BINARY and `int`
    /// for the DWORD/QWORD types.
    #[new]
    fn new(key: String, value: String, value_type: u32, data: &Bound<'_, PyAny>) -> PyResult<Self> {
        let value_type = PolicyRegType::from_u32(value_type).map_err(policy_error_to_py)?;

        let data = if value_type.is_text() {
            PolicyData::String(data.extract::<String>()?)
        } else if value_type.is_text_list() {
            PolicyData::MultiString(data.extract::<Vec<String>>()?)
        } else if value_type == PolicyRegType::Binary {
            PolicyData::Binary(data.extract::<Vec<u8>>()?)
        } else if matches!(
            value_type,
            PolicyRegType::DwordLittleEndian | PolicyRegType::DwordBigEndian
        ) {
            PolicyData::Dword(data.extract::<u32>()?)
        } else {
            PolicyData::Qword(data.extract::<u64>()?)
        };

        let inner =
            PolicyInstruction::new(key, value, value_type, data).map_err(policy_error_to_py)?;
        Ok(PyPolicyInstruction { inner })
    }

    /// Registry key path.
    #[getter]
    fn key(&self) -> String {
        self.inner.key.clone()
    }

    /// Value name.
    #[getter]
    fn value(&self) -> String {
        self.inner.value.clone()
    }

    /// On-wire type tag.
    #[getter]
    fn value_type(&self) -> u32 {
        self.inner.value_type.as_u32()
    }

    /// Conventional REG_* type name.
    #[getter]
    fn type_name(&self) -> &'static str {
        self.inner.value_type.name()
    }

    /// The payload as a native Python value.
    #[getter]
    fn data(&self, py: Python<'_>) -> PyObject {
        match &self.inner.data {
            PolicyData::String(s) => s.clone().into_py(py),
            PolicyData::MultiString(items) => items.clone().into_py(py),
            PolicyData::Binary(bytes) => PyBytes::new_bound(py, bytes).into_py(py),
            PolicyData::Dword(v) => v.into_py(py),
            PolicyData::Qword(v) => v.into_py(py),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "PolicyInstruction(key={:?}, value={:?}, type={})",
            self.inner.key,
            self.inner.value,
            self.inner.value_type.name()
        )
    }
}

/// Python wrapper for PolicyFile.
#[pyclass(name = "PolicyFile")]
#[derive(Clone)]
pub struct PyPolicyFile {
    inner: PolicyFile,
}

#[pymethods]
impl PyPolicyFile {
    /// Build a document from a list of instructions, or the empty
    /// document when `instructions` is None.
    #[new]
    #[pyo3(signature = (instructions=None))]
    fn new(instructions: Option<Vec<PyPolicyInstruction>>) -> Self {
        let inner = match instructions {
            Some(list) => {
                PolicyFile::with_instructions(list.into_iter().map(|i| i.inner).collect())
            }
            None => PolicyFile::empty(),
        };
        PyPolicyFile { inner }
    }

    /// The instructions in wire order.
    #[getter]
    fn instructions<'py>(&self, py: Python<'py>) -> Bound<'py, PyList> {
        PyList::new_bound(
            py,
            self.inner
                .instructions()
                .iter()
                .map(|i| PyPolicyInstruction { inner: i.clone() }.into_py(py)),
        )
    }

    /// True for the empty document (no header on the wire).
    #[getter]
    fn is_empty(&self) -> bool {
        self.inner.body.is_none()
    }

    fn __len__(&self) -> usize {
        self.inner.instructions().len()
    }

    fn __repr__(&self) -> String {
        match &self.inner.body {
            Some(body) => format!("PolicyFile({} instructions)", body.len()),
            None => "PolicyFile(empty)".to_string(),
        }
    }
}

/// Parse PReg bytes into a policy document.
#[pyfunction]
fn loads(data: &[u8]) -> PyResult<PyPolicyFile> {
    let parser = PregParser::new();
    let mut cursor = std::io::Cursor::new(data);
    let inner = parser.parse(&mut cursor).map_err(policy_error_to_py)?;
    Ok(PyPolicyFile { inner })
}

/// Serialize a policy document to PReg bytes.
#[pyfunction]
fn dumps(py: Python<'_>, file: &PyPolicyFile) -> PyResult<PyObject> {
    let parser = PregParser::new();
    let mut out = Vec::new();
    parser
        .write(&mut out, &file.inner)
        .map_err(policy_error_to_py)?;
    Ok(PyBytes::new_bound(py, &out).into_py(py))
}

/// Python module definition.
#[pymodule]
fn preg_parser(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPolicyFile>()?;
    m.add_class::<PyPolicyInstruction>()?;
    m.add_function(wrap_pyfunction!(loads, m)?)?;
    m.add_function(wrap_pyfunction!(dumps, m)?)?;
    m.add("__version__", crate::VERSION)?;
    Ok(())
}
