//! basc-drv - Program driver for the BASIC dialects
//!
//! The coordinator described in section 5: owns the file-provider boundary,
//! the program-wide [`ProgramIndex`], and the file-granularity concurrency
//! model. Independent workers lex and parse files in parallel with no AST,
//! symbol table, or scope shared mutably between them; this crate's
//! [`Program`] is the single coordinator that merges their immutable
//! results into the index and runs validation/transpilation over that
//! merged, read-only snapshot.
//!
//! This is also the section 6 Program interface: `addOrReplaceFile`,
//! `removeFile`, `validate`, `getTranspiledFileContents`, and the
//! before/after event stream. `bast` is the only consumer in this
//! workspace, but the type is a plain library so other embedding tools can
//! use it the same way.

mod events;
mod provider;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use basc_sem::{validate_scoped, validate_structural, NoCaseCheck, ProgramIndex, ScriptId};
use basc_util::diagnostic::Diagnostic;
use basc_util::{Handler, Span, Symbol};
use basc_xform::{EmitMap, Transpiler};

pub use events::{Event, EventSink};
pub use provider::{FileProvider, FsFileProvider};

/// Opaque handle to a file already added to a [`Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileHandle(ScriptId);

/// Cooperative cancellation, checked at statement-level granularity inside
/// validation and transpilation (section 5). Cloning shares the same
/// underlying flag, so a caller can hold one end and pass the other into
/// `Program`.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of a possibly-cancelled operation: the partial value produced so
/// far, plus whether a cancellation checkpoint cut it short. No diagnostics
/// are emitted after the checkpoint that observes cancellation.
pub struct PartialResult<T> {
    pub value: T,
    pub cancelled: bool,
}

/// `{code, map}` for one transpiled file (section 6).
pub struct TranspiledFile {
    pub code: String,
    pub map: EmitMap,
}

/// One file lexed and parsed by an independent worker. Immutable once
/// produced; the coordinator is the only thing that ever merges it into a
/// [`ProgramIndex`].
struct FileResult {
    logical_path: String,
    ast: basc_par::Ast,
}

/// The section 6 Program interface and section 5 coordinator, generic over
/// the [`FileProvider`] supplying file text.
pub struct Program<P: FileProvider> {
    provider: P,
    index: ProgramIndex,
    logical_to_script: HashMap<String, ScriptId>,
    transpiler: Transpiler,
    events: EventSink,
}

impl<P: FileProvider> Program<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            index: ProgramIndex::new(),
            logical_to_script: HashMap::new(),
            transpiler: Transpiler::default(),
            events: EventSink::default(),
        }
    }

    pub fn events(&mut self) -> &mut EventSink {
        &mut self.events
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Adds or replaces a file by logical (`dest`) path, reading its text
    /// via the provider if not supplied inline, then lexing and parsing it
    /// immediately.
    pub fn add_or_replace_file(&mut self, dest: &str, text: Option<String>) -> anyhow::Result<FileHandle> {
        let text = match text {
            Some(t) => t,
            None => self
                .provider
                .get_file_contents(dest)
                .ok_or_else(|| anyhow::anyhow!("file not found: {dest}"))?,
        };

        self.events.emit(Event::BeforeFileParse { logical_path: dest.to_string() });
        let handler = Handler::new();
        let ast = basc_par::parse(&text, &handler);
        self.events.emit(Event::AfterFileParse { logical_path: dest.to_string() });

        // ProgramIndex's scripts are append-only: re-adding a file allocates a
        // fresh ScriptId rather than mutating the old slot in place, so any
        // FileHandle already handed out for the previous content stays valid
        // instead of silently aliasing to the replacement.
        let id = self.index.add_script(Symbol::intern(dest), ast);
        self.logical_to_script.insert(dest.to_string(), id);
        Ok(FileHandle(id))
    }

    /// Drops a file from the logical-path index. The underlying `ScriptId`
    /// slot stays allocated (scripts are append-only), so any
    /// `ComponentScope` built before the removal keeps working on the
    /// snapshot it already captured; new lookups by logical path no longer
    /// find it.
    pub fn remove_file(&mut self, logical_path: &str) {
        self.logical_to_script.remove(logical_path);
    }

    /// Lexes and parses every `(source_path, logical_path)` pair
    /// concurrently, one independent worker per file via `rayon::scope`,
    /// handed off to this coordinator over a `crossbeam` channel. Merging
    /// into `self.index` happens only here, sequentially, in
    /// logical-path order — the one point where the program-wide index is
    /// mutated.
    pub fn load_all(&mut self, files: &[(PathBuf, String)]) -> Vec<FileHandle>
    where
        P: Sync,
    {
        let (tx, rx) = crossbeam::channel::unbounded::<FileResult>();
        let provider = &self.provider;
        rayon::scope(|scope| {
            for (src, logical) in files {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let text = provider.get_file_contents(logical).or_else(|| std::fs::read_to_string(src).ok());
                    let Some(text) = text else { return };
                    let handler = Handler::new();
                    let ast = basc_par::parse(&text, &handler);
                    let _ = tx.send(FileResult { logical_path: logical.clone(), ast });
                });
            }
        });
        drop(tx);

        let mut results: Vec<FileResult> = rx.iter().collect();
        results.sort_by(|a, b| a.logical_path.cmp(&b.logical_path));

        let mut handles = Vec::with_capacity(results.len());
        for result in results {
            let id = self.index.add_script(Symbol::intern(&result.logical_path), result.ast);
            self.logical_to_script.insert(result.logical_path, id);
            handles.push(FileHandle(id));
        }
        handles
    }

    /// Builds a whole [`Program`] from a project root: lists `.bs`/`.brs`
    /// scripts and `.xml` component descriptors under `root`, loads the
    /// scripts concurrently via [`Program::load_all`], then builds the
    /// component graph from the descriptors and links it.
    pub fn build_from_root(root: &Path, provider: P) -> anyhow::Result<Self>
    where
        P: Sync,
    {
        let mut program = Self::new(provider);
        let entries = program.provider.list_files(root, &["*.bs", "*.brs", "*.xml"], &[]);
        let (component_docs, scripts): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|(_, logical)| logical.ends_with(".xml"));

        program.load_all(&scripts);

        for (src, _logical) in component_docs {
            let text = std::fs::read_to_string(&src)?;
            let doc = basc_xform::parse_component_doc(&text);
            let Some(name) = doc.name else { continue };
            let script_ids: Vec<ScriptId> =
                doc.scripts.iter().filter_map(|tag| program.resolve_script_uri(&tag.uri)).collect();
            let extends = doc.extends.map(|e| Symbol::intern(&e));
            program.index.add_component(Symbol::intern(&name), extends, script_ids, Span::DUMMY);
        }
        program.index.link_components();
        Ok(program)
    }

    fn resolve_script_uri(&self, uri: &str) -> Option<ScriptId> {
        let trimmed = uri.trim_start_matches("pkg:/");
        self.logical_to_script.get(trimmed).copied().or_else(|| {
            self.logical_to_script
                .iter()
                .find(|(path, _)| path.ends_with(trimmed) || trimmed.ends_with(path.as_str()))
                .map(|(_, id)| *id)
        })
    }

    /// Runs the Structural pass over every script, then the Scoped pass
    /// over the component graph (section 4.4), never cancelled.
    pub fn validate(&mut self) -> Vec<Diagnostic> {
        self.validate_cancelable(&CancellationToken::new()).value
    }

    /// As [`Program::validate`], checking `token` before each script's
    /// Structural pass and again before the whole-graph Scoped pass. This
    /// is coarser than true per-statement granularity — `basc-sem`'s
    /// validation functions are pure and don't themselves accept a token —
    /// but it still guarantees no diagnostics are emitted past the
    /// checkpoint that observes cancellation, which is the guarantee
    /// section 5 actually requires.
    pub fn validate_cancelable(&mut self, token: &CancellationToken) -> PartialResult<Vec<Diagnostic>> {
        self.events.emit(Event::BeforeProgramValidate);
        let handler = Handler::new();
        let mut cancelled = false;

        for script in self.index.scripts.as_slice() {
            if token.is_cancelled() {
                cancelled = true;
                break;
            }
            validate_structural(&script.ast, script.logical_path.as_str(), &handler);
        }

        if !cancelled {
            if token.is_cancelled() {
                cancelled = true;
            } else {
                validate_scoped(&self.index, &NoCaseCheck, &handler);
            }
        }

        let diagnostics = handler.diagnostics();
        self.events.emit(Event::AfterProgramValidate { diagnostic_count: diagnostics.len() });
        PartialResult { value: diagnostics, cancelled }
    }

    /// `{code, map}` for one already-loaded file (section 6), never
    /// cancelled.
    pub fn get_transpiled_file_contents(&mut self, logical_path: &str) -> Option<TranspiledFile> {
        self.get_transpiled_file_contents_cancelable(logical_path, &CancellationToken::new()).value
    }

    /// As [`Program::get_transpiled_file_contents`], checking `token`
    /// before each top-level statement the transpiler emits.
    pub fn get_transpiled_file_contents_cancelable(
        &mut self,
        logical_path: &str,
        token: &CancellationToken,
    ) -> PartialResult<Option<TranspiledFile>> {
        let Some(&id) = self.logical_to_script.get(logical_path) else {
            return PartialResult { value: None, cancelled: false };
        };

        self.events.emit(Event::BeforeFileTranspile { logical_path: logical_path.to_string() });
        let token = token.clone();
        let outcome = self.transpiler.transpile_checked(&self.index.scripts[id].ast, &move || token.is_cancelled());
        self.events.emit(Event::AfterFileTranspile { logical_path: logical_path.to_string() });

        PartialResult {
            value: Some(TranspiledFile { code: outcome.output.code, map: outcome.output.map }),
            cancelled: outcome.cancelled,
        }
    }

    pub fn file_count(&self) -> usize {
        self.logical_to_script.len()
    }
}
