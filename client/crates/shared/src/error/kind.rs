//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum used to decide how a failure is surfaced
//! (retry on the next tick, report to the operator, or log only).

use serde::Serialize;

/// エラー種別の列挙体
///
/// クライアント全体で共通のエラー分類を定義します。
/// 各バリアントは「再試行可能か」「機能を停止させるか」に対応付けられます。
///
/// ## Notes
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::Transport;
/// assert!(kind.is_retryable());
/// assert_eq!(kind.as_str(), "Transport");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// カメラが利用できない、または権限が拒否された
    Device,
    /// デバイスがまだサイズ付きフレームを生成していない
    NotReady,
    /// ネットワーク到達不可・タイムアウト
    Transport,
    /// 2xx 以外のステータスコード
    UnexpectedStatus,
    /// レスポンス本文が期待した形式ではない
    MalformedResponse,
    /// 設定値が不正
    Configuration,
    /// 操作がキャンセルされた、またはコントローラが終了済み
    Cancelled,
    /// 内部エラー
    Internal,
}

impl ErrorKind {
    /// 表示用の文字列表現を取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::MalformedResponse.as_str(), "Malformed Response");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Device => "Device",
            ErrorKind::NotReady => "Not Ready",
            ErrorKind::Transport => "Transport",
            ErrorKind::UnexpectedStatus => "Unexpected Status",
            ErrorKind::MalformedResponse => "Malformed Response",
            ErrorKind::Configuration => "Configuration",
            ErrorKind::Cancelled => "Cancelled",
            ErrorKind::Internal => "Internal",
        }
    }

    /// 次の周期で自然に再試行できるエラーかどうかを判定
    ///
    /// 通信系のエラーはセッションを失敗させず、次のティックで再送します。
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::NotReady
                | ErrorKind::Transport
                | ErrorKind::UnexpectedStatus
                | ErrorKind::MalformedResponse
        )
    }

    /// 現在の機能インスタンスを停止させるエラーかどうかを判定
    ///
    /// オペレーターによる再操作が必要です。
    #[inline]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            ErrorKind::Device | ErrorKind::Configuration | ErrorKind::Internal
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
