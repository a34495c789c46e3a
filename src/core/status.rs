use log::info;

/// 利用者向けステータス表示（LCD など）
///
/// 送りっぱなしで、表示の成否は呼び出し側に返さない。
pub trait StatusSink {
    fn show_status(&mut self, text: &str);
}

/// ステータスをログに流すだけの実装
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn show_status(&mut self, text: &str) {
        info!("[STATUS] {}", text);
    }
}

impl<T: StatusSink + ?Sized> StatusSink for &mut T {
    fn show_status(&mut self, text: &str) {
        (**self).show_status(text);
    }
}
