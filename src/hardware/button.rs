use embedded_hal::digital::InputPin;

/// シャッターボタン
///
/// 押されていない → 押された、の変化でだけ撮影を発火する。
/// 押し続けても 1 回しか発火しない。
#[derive(Debug, Clone)]
pub struct ShutterButton {
    active_low: bool,
    was_pressed: bool,
}

impl ShutterButton {
    pub fn new(active_low: bool) -> Self {
        ShutterButton {
            active_low,
            was_pressed: false,
        }
    }

    /// 現在の押下状態を与え、押下エッジなら true
    pub fn update(&mut self, pressed: bool) -> bool {
        let edge = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        edge
    }

    pub fn poll<P: InputPin>(&mut self, pin: &mut P) -> Result<bool, P::Error> {
        let pressed = if self.active_low {
            pin.is_low()?
        } else {
            pin.is_high()?
        };
        Ok(self.update(pressed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_on_press_edge() {
        let mut button = ShutterButton::new(true);
        assert!(!button.update(false));
        assert!(button.update(true));
        assert!(!button.update(true));
        assert!(!button.update(false));
        assert!(button.update(true));
    }
}
