//! Domain identifiers (strongly-typed IDs).
//!
//! # 数値 ID + Phantom Type パターン
//! 上流（課表・学習記録テーブル）の主キーは 64-bit 整数なので、そのまま `u64` を保持します。
//! `Id<T>` というジェネリック型で共通実装を提供しつつ、
//! `T` は実行時には使わない（PhantomData）マーカー型として、
//! コンパイル時の型安全性を提供します。
//!
//! ## なぜこのパターンを使うのか？
//! - LessonId と SectionId はどちらも `u64` だが、取り違えるとキャッシュの
//!   別フィールドを読んでしまう（静かに壊れる）
//! - 型が違えばコンパイルエラーになる
//!
//! Display / Serialize はどちらも素の数値になります（キャッシュキーや JSON にそのまま埋め込むため）。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// IdMarker は各 ID 型のマーカー trait
pub trait IdMarker: Send + Sync + 'static {}

/// ジェネリック ID 型
///
/// # 例
/// ```ignore
/// let lesson = LessonId::new(1);
/// let section = SectionId::new(1);
/// // lesson と section は異なる型なので、混同できない
/// ```
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    value: u64,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub const fn new(value: u64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub const fn get(&self) -> u64 {
        self.value
    }
}

impl<T: IdMarker> From<u64> for Id<T> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> FromStr for Id<T> {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self::new)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// 課表（ユーザー × コース）のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lesson {}

impl IdMarker for Lesson {}

/// 小節（動画・章）のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {}

impl IdMarker for Section {}

/// 学習記録のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Record {}

impl IdMarker for Record {}

/// ユーザーのマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum User {}

impl IdMarker for User {}

// ========================================
// Type Alias（使いやすさのため）
// ========================================

/// Identifier of a lesson (one user's enrollment in one course).
pub type LessonId = Id<Lesson>;

/// Identifier of a section within a lesson.
pub type SectionId = Id<Section>;

/// Identifier of a persisted learning record.
pub type RecordId = Id<Record>;

/// Identifier of an authenticated user.
pub type UserId = Id<User>;
