// WHY: The boundary layer alone performs type erasure; core components never
// see raw pointers. Every operation validates its required arguments, and no
// panic crosses the boundary — internal failures become status codes.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;
use std::slice;
use std::str;

use crate::extractor::{Entity, EntityExtractor, EntityType};
use crate::matcher::{AhoCorasickAutomaton, LiteralScanner, Match};
use crate::parallel_extraction::extract_all_parallel;
use crate::tokenizer::{Token, Tokenizer};

pub const FLOW_OK: i32 = 0;
pub const FLOW_ERR_INVALID_ARGUMENT: i32 = -1;
pub const FLOW_ERR_ALLOCATION: i32 = -2;
pub const FLOW_ERR_INVALID_UTF8: i32 = -3;
pub const FLOW_ERR_INTERNAL: i32 = -4;

/// Opaque handle types
pub type FlowPatternMatcherHandle = *mut LiteralScanner;
pub type FlowAhoCorasickHandle = *mut AhoCorasickAutomaton;
pub type FlowTokenizerHandle = *mut Tokenizer;
pub type FlowEntityMatcherHandle = *mut EntityExtractor;

#[repr(C)]
pub struct FlowMatch {
    pub start: usize,
    pub end: usize,
    pub pattern_id: usize,
    pub confidence: f32,
}

impl From<Match> for FlowMatch {
    fn from(m: Match) -> Self {
        Self {
            start: m.start,
            end: m.end,
            pattern_id: m.pattern_id,
            confidence: m.confidence,
        }
    }
}

#[repr(C)]
pub struct FlowToken {
    /// Owned nul-terminated copy of the token text; freed by
    /// `flow_tokenizer_free_tokens`.
    pub text: *mut c_char,
    pub token_type: i32,
    pub start: usize,
    pub end: usize,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEntityType {
    Date = 0,
    Person = 1,
    Organization = 2,
    Amount = 3,
    Email = 4,
    Unknown = 5,
}

/// Map a raw boundary integer to an entity type. Out-of-range values fall
/// back to `Unknown` — enum parameters arrive as plain ints from C and must
/// not be trusted to be in range.
fn entity_type_from_raw(raw: i32) -> EntityType {
    match raw {
        0 => EntityType::Date,
        1 => EntityType::Person,
        2 => EntityType::Organization,
        3 => EntityType::Amount,
        4 => EntityType::Email,
        _ => EntityType::Unknown,
    }
}

impl From<EntityType> for FlowEntityType {
    fn from(t: EntityType) -> Self {
        match t {
            EntityType::Date => FlowEntityType::Date,
            EntityType::Person => FlowEntityType::Person,
            EntityType::Organization => FlowEntityType::Organization,
            EntityType::Amount => FlowEntityType::Amount,
            EntityType::Email => FlowEntityType::Email,
            EntityType::Unknown => FlowEntityType::Unknown,
        }
    }
}

#[repr(C)]
pub struct FlowEntity {
    /// Owned nul-terminated copy of the entity value; freed by
    /// `flow_entity_matcher_free_entities`.
    pub value: *mut c_char,
    pub entity_type: FlowEntityType,
    pub start: usize,
    pub end: usize,
    pub confidence: f32,
}

/// Borrow `len` raw bytes as UTF-8 text.
///
/// # Safety
/// `text` must point to `len` readable bytes for the duration of the call.
unsafe fn text_from_raw<'a>(text: *const c_char, len: usize) -> Result<&'a str, i32> {
    let bytes = slice::from_raw_parts(text as *const u8, len);
    str::from_utf8(bytes).map_err(|_| FLOW_ERR_INVALID_UTF8)
}

/// Hand a result array to the caller as an out-parameter. Empty results
/// become a null pointer with a zero count, still `FLOW_OK`.
unsafe fn write_array<T>(items: Vec<T>, out_ptr: *mut *mut T, out_count: *mut usize) -> i32 {
    *out_count = items.len();
    if items.is_empty() {
        *out_ptr = ptr::null_mut();
        return FLOW_OK;
    }
    *out_ptr = Box::into_raw(items.into_boxed_slice()) as *mut T;
    FLOW_OK
}

/// Reclaim an array previously handed out by `write_array`.
///
/// # Safety
/// `ptr`/`count` must be exactly the pair produced by one `write_array`
/// call, and must not have been freed before.
unsafe fn reclaim_array<T>(ptr: *mut T, count: usize) {
    drop(Box::from_raw(ptr::slice_from_raw_parts_mut(ptr, count)));
}

/// Copy a string into an owned nul-terminated buffer. Interior nul bytes
/// (possible when the scanned text itself contained them) yield a null
/// pointer rather than a truncated string.
fn owned_c_string(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

fn matches_into_flat(results: Vec<Match>) -> Result<Vec<FlowMatch>, i32> {
    let mut flat = Vec::new();
    if flat.try_reserve_exact(results.len()).is_err() {
        return Err(FLOW_ERR_ALLOCATION);
    }
    flat.extend(results.into_iter().map(FlowMatch::from));
    Ok(flat)
}

fn entities_into_flat(results: Vec<Entity>) -> Result<Vec<FlowEntity>, i32> {
    let mut flat = Vec::new();
    if flat.try_reserve_exact(results.len()).is_err() {
        return Err(FLOW_ERR_ALLOCATION);
    }
    flat.extend(results.into_iter().map(|e| FlowEntity {
        value: owned_c_string(&e.value),
        entity_type: e.entity_type.into(),
        start: e.start,
        end: e.end,
        confidence: e.confidence,
    }));
    Ok(flat)
}

fn tokens_into_flat(results: Vec<Token<'_>>) -> Result<Vec<FlowToken>, i32> {
    let mut flat = Vec::new();
    if flat.try_reserve_exact(results.len()).is_err() {
        return Err(FLOW_ERR_ALLOCATION);
    }
    flat.extend(results.into_iter().map(|tok| FlowToken {
        text: owned_c_string(tok.text),
        token_type: tok.token_type as i32,
        start: tok.start,
        end: tok.end,
    }));
    Ok(flat)
}

// Literal scanner

#[no_mangle]
pub extern "C" fn flow_pattern_matcher_create() -> FlowPatternMatcherHandle {
    Box::into_raw(Box::new(LiteralScanner::new()))
}

#[no_mangle]
pub extern "C" fn flow_pattern_matcher_destroy(handle: FlowPatternMatcherHandle) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle));
        }
    }
}

#[no_mangle]
pub extern "C" fn flow_pattern_matcher_add_pattern(
    handle: FlowPatternMatcherHandle,
    pattern: *const c_char,
    id: usize,
    confidence: f32,
) {
    if handle.is_null() || pattern.is_null() {
        return;
    }
    unsafe {
        let scanner = &mut *handle;
        if let Ok(pattern) = CStr::from_ptr(pattern).to_str() {
            scanner.add_pattern(pattern, id, confidence);
        }
    }
}

#[no_mangle]
pub extern "C" fn flow_pattern_matcher_find_all(
    handle: FlowPatternMatcherHandle,
    text: *const c_char,
    text_len: usize,
    out_matches: *mut *mut FlowMatch,
    out_count: *mut usize,
) -> i32 {
    if handle.is_null() || text.is_null() || out_matches.is_null() || out_count.is_null() {
        return FLOW_ERR_INVALID_ARGUMENT;
    }

    unsafe {
        let text = match text_from_raw(text, text_len) {
            Ok(t) => t,
            Err(code) => return code,
        };
        let scanner = &*handle;

        match catch_unwind(AssertUnwindSafe(|| matches_into_flat(scanner.find_all(text)))) {
            Ok(Ok(flat)) => write_array(flat, out_matches, out_count),
            Ok(Err(code)) => code,
            Err(_) => FLOW_ERR_INTERNAL,
        }
    }
}

/// Free a match array produced by `flow_pattern_matcher_find_all` or
/// `flow_aho_corasick_search`.
#[no_mangle]
pub extern "C" fn flow_pattern_matcher_free_matches(matches: *mut FlowMatch, count: usize) {
    if matches.is_null() {
        return;
    }
    unsafe {
        reclaim_array(matches, count);
    }
}

// Aho-Corasick automaton

#[no_mangle]
pub extern "C" fn flow_aho_corasick_create() -> FlowAhoCorasickHandle {
    Box::into_raw(Box::new(AhoCorasickAutomaton::new()))
}

#[no_mangle]
pub extern "C" fn flow_aho_corasick_destroy(handle: FlowAhoCorasickHandle) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle));
        }
    }
}

#[no_mangle]
pub extern "C" fn flow_aho_corasick_add_pattern(
    handle: FlowAhoCorasickHandle,
    pattern: *const c_char,
    id: usize,
) {
    if handle.is_null() || pattern.is_null() {
        return;
    }
    unsafe {
        let automaton = &mut *handle;
        if let Ok(pattern) = CStr::from_ptr(pattern).to_str() {
            automaton.add_pattern(pattern, id);
        }
    }
}

#[no_mangle]
pub extern "C" fn flow_aho_corasick_build(handle: FlowAhoCorasickHandle) {
    if handle.is_null() {
        return;
    }
    unsafe {
        (*handle).build();
    }
}

#[no_mangle]
pub extern "C" fn flow_aho_corasick_search(
    handle: FlowAhoCorasickHandle,
    text: *const c_char,
    text_len: usize,
    out_matches: *mut *mut FlowMatch,
    out_count: *mut usize,
) -> i32 {
    if handle.is_null() || text.is_null() || out_matches.is_null() || out_count.is_null() {
        return FLOW_ERR_INVALID_ARGUMENT;
    }

    unsafe {
        let text = match text_from_raw(text, text_len) {
            Ok(t) => t,
            Err(code) => return code,
        };
        let automaton = &*handle;

        match catch_unwind(AssertUnwindSafe(|| matches_into_flat(automaton.search(text)))) {
            Ok(Ok(flat)) => write_array(flat, out_matches, out_count),
            Ok(Err(code)) => code,
            Err(_) => FLOW_ERR_INTERNAL,
        }
    }
}

// Tokenizer

#[no_mangle]
pub extern "C" fn flow_tokenizer_create() -> FlowTokenizerHandle {
    Box::into_raw(Box::new(Tokenizer::new()))
}

#[no_mangle]
pub extern "C" fn flow_tokenizer_destroy(handle: FlowTokenizerHandle) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle));
        }
    }
}

#[no_mangle]
pub extern "C" fn flow_tokenizer_tokenize(
    handle: FlowTokenizerHandle,
    text: *const c_char,
    text_len: usize,
    out_tokens: *mut *mut FlowToken,
    out_count: *mut usize,
) -> i32 {
    if handle.is_null() || text.is_null() || out_tokens.is_null() || out_count.is_null() {
        return FLOW_ERR_INVALID_ARGUMENT;
    }

    unsafe {
        let text = match text_from_raw(text, text_len) {
            Ok(t) => t,
            Err(code) => return code,
        };
        let tokenizer = &*handle;

        match catch_unwind(AssertUnwindSafe(|| tokens_into_flat(tokenizer.tokenize(text)))) {
            Ok(Ok(flat)) => write_array(flat, out_tokens, out_count),
            Ok(Err(code)) => code,
            Err(_) => FLOW_ERR_INTERNAL,
        }
    }
}

#[no_mangle]
pub extern "C" fn flow_tokenizer_free_tokens(tokens: *mut FlowToken, count: usize) {
    if tokens.is_null() {
        return;
    }
    unsafe {
        let items = slice::from_raw_parts_mut(tokens, count);
        for token in items.iter_mut() {
            if !token.text.is_null() {
                drop(CString::from_raw(token.text));
            }
        }
        reclaim_array(tokens, count);
    }
}

// Entity matcher

#[no_mangle]
pub extern "C" fn flow_entity_matcher_create() -> FlowEntityMatcherHandle {
    Box::into_raw(Box::new(EntityExtractor::new()))
}

#[no_mangle]
pub extern "C" fn flow_entity_matcher_destroy(handle: FlowEntityMatcherHandle) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle));
        }
    }
}

#[no_mangle]
pub extern "C" fn flow_entity_matcher_add_date_patterns(handle: FlowEntityMatcherHandle) {
    if handle.is_null() {
        return;
    }
    unsafe {
        (*handle).add_date_patterns();
    }
}

#[no_mangle]
pub extern "C" fn flow_entity_matcher_add_amount_patterns(handle: FlowEntityMatcherHandle) {
    if handle.is_null() {
        return;
    }
    unsafe {
        (*handle).add_amount_patterns();
    }
}

#[no_mangle]
pub extern "C" fn flow_entity_matcher_add_keywords(
    handle: FlowEntityMatcherHandle,
    entity_type: i32,
    keywords: *const *const c_char,
    num_keywords: usize,
) {
    if handle.is_null() || keywords.is_null() {
        return;
    }
    unsafe {
        let extractor = &mut *handle;
        let raw = slice::from_raw_parts(keywords, num_keywords);
        let collected: Vec<&str> = raw
            .iter()
            .filter(|ptr| !ptr.is_null())
            .filter_map(|&ptr| CStr::from_ptr(ptr).to_str().ok())
            .collect();
        extractor.add_keywords(entity_type_from_raw(entity_type), &collected);
    }
}

#[no_mangle]
pub extern "C" fn flow_entity_matcher_extract(
    handle: FlowEntityMatcherHandle,
    text: *const c_char,
    text_len: usize,
    out_entities: *mut *mut FlowEntity,
    out_count: *mut usize,
) -> i32 {
    if handle.is_null() || text.is_null() || out_entities.is_null() || out_count.is_null() {
        return FLOW_ERR_INVALID_ARGUMENT;
    }

    unsafe {
        let text = match text_from_raw(text, text_len) {
            Ok(t) => t,
            Err(code) => return code,
        };
        let extractor = &mut *handle;

        match catch_unwind(AssertUnwindSafe(|| entities_into_flat(extractor.extract(text)))) {
            Ok(Ok(flat)) => write_array(flat, out_entities, out_count),
            Ok(Err(code)) => code,
            Err(_) => FLOW_ERR_INTERNAL,
        }
    }
}

#[no_mangle]
pub extern "C" fn flow_entity_matcher_extract_type(
    handle: FlowEntityMatcherHandle,
    text: *const c_char,
    text_len: usize,
    entity_type: i32,
    out_entities: *mut *mut FlowEntity,
    out_count: *mut usize,
) -> i32 {
    if handle.is_null() || text.is_null() || out_entities.is_null() || out_count.is_null() {
        return FLOW_ERR_INVALID_ARGUMENT;
    }

    unsafe {
        let text = match text_from_raw(text, text_len) {
            Ok(t) => t,
            Err(code) => return code,
        };
        let extractor = &mut *handle;
        let requested = entity_type_from_raw(entity_type);

        match catch_unwind(AssertUnwindSafe(|| {
            entities_into_flat(extractor.extract_type(text, requested))
        })) {
            Ok(Ok(flat)) => write_array(flat, out_entities, out_count),
            Ok(Err(code)) => code,
            Err(_) => FLOW_ERR_INTERNAL,
        }
    }
}

#[no_mangle]
pub extern "C" fn flow_entity_matcher_free_entities(entities: *mut FlowEntity, count: usize) {
    if entities.is_null() {
        return;
    }
    unsafe {
        let items = slice::from_raw_parts_mut(entities, count);
        for entity in items.iter_mut() {
            if !entity.value.is_null() {
                drop(CString::from_raw(entity.value));
            }
        }
        reclaim_array(entities, count);
    }
}

/// Run the full three-way parallel extraction end-to-end without requiring
/// the caller to create and destroy an extractor handle. Results follow the
/// fixed pass order (dates, amounts, emails) and are freed with
/// `flow_entity_matcher_free_entities`.
#[no_mangle]
pub extern "C" fn flow_extract_all_parallel(
    text: *const c_char,
    text_len: usize,
    out_entities: *mut *mut FlowEntity,
    out_count: *mut usize,
) -> i32 {
    if text.is_null() || out_entities.is_null() || out_count.is_null() {
        return FLOW_ERR_INVALID_ARGUMENT;
    }

    unsafe {
        let text = match text_from_raw(text, text_len) {
            Ok(t) => t,
            Err(code) => return code,
        };

        match catch_unwind(AssertUnwindSafe(|| entities_into_flat(extract_all_parallel(text)))) {
            Ok(Ok(flat)) => write_array(flat, out_entities, out_count),
            Ok(Err(code)) => code,
            Err(_) => FLOW_ERR_INTERNAL,
        }
    }
}
