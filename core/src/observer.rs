use crate::*;

/// Receives a fresh [`BoardView`] every time a game changes.
pub trait Observer {
    fn update(&mut self, view: &BoardView);
}

impl<F> Observer for F
where
    F: FnMut(&BoardView),
{
    fn update(&mut self, view: &BoardView) {
        self(view)
    }
}
