// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

#[test]
fn non_empty_from_empty() {
    assert_eq!(None, non_empty_from(""));
    assert_eq!(Some(" ".to_owned()), non_empty_from(" "));
}

#[test]
fn trimmed_non_empty_from_blank() {
    assert_eq!(None, trimmed_non_empty_from(" \t "));
    assert_eq!(Some("Acme".to_owned()), trimmed_non_empty_from(" Acme "));
}

#[test]
fn trimmed_non_empty_from_inner_whitespace() {
    assert_eq!(
        Some("a \n b".to_owned()),
        trimmed_non_empty_from(" \t a \n b \r ")
    );
}
