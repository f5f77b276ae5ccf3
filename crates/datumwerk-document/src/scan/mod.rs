// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanned-page handling: OCR preparation pipeline and the OCR engine wrapper.

#[cfg(feature = "ocr")]
pub mod ocr;
pub mod prepare;
