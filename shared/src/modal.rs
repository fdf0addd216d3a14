//! 单槽模态框状态
//!
//! 同一时间只有一个模态框；再次 `open` 会直接覆盖当前内容，不排队。

#[derive(Debug, Clone, PartialEq)]
pub struct ModalSlot<C> {
    title: String,
    content: Option<C>,
}

impl<C> Default for ModalSlot<C> {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: None,
        }
    }
}

impl<C> ModalSlot<C> {
    pub fn open(&mut self, title: impl Into<String>, content: C) {
        self.title = title.into();
        self.content = Some(content);
    }

    pub fn close(&mut self) {
        self.title.clear();
        self.content = None;
    }

    pub fn is_open(&self) -> bool {
        self.content.is_some()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> Option<&C> {
        self.content.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_open_overwrites() {
        let mut slot = ModalSlot::default();
        slot.open("Новый склад", 1);
        slot.open("Приход", 2);
        assert_eq!(slot.title(), "Приход");
        assert_eq!(slot.content(), Some(&2));
        slot.close();
        assert!(!slot.is_open());
        assert_eq!(slot.title(), "");
    }
}
