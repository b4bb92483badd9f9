use std::sync::atomic::{AtomicBool, Ordering};

/// Tracks which prelude snippets a rendered artifact needs.
#[derive(Default, Debug)]
pub struct RuntimeHelpers {
  inner: Inner,
}

macro_rules! define_helpers {
    (
        Helpers {
            $( $name:ident: ( $( $dep:ident ),* ), )*
        }
    ) => {

        #[derive(Debug,Default)]
        struct Inner {
            $( $name: AtomicBool, )*
        }

        impl RuntimeHelpers {
            /// Snippets in declaration order, so imports always come first.
            pub fn generate_helpers(&self) -> Vec<&'static str> {
                let mut to = vec![];
                $(
                    if self.inner.$name.load(Ordering::Relaxed) {
                        to.push(include_str!(concat!(
                            "./snippets/_",
                            stringify!($name),
                            ".js"
                        )));
                    }
                )*
                to
            }

            $(
                pub fn $name(&self) {
                    self.inner.$name.store(true, Ordering::Relaxed);
                    $(
                        self.$dep();
                    )*
                }
            )*
        }
    };
}

impl RuntimeHelpers {
  pub fn new() -> Self {
    Self::default()
  }
}

define_helpers!(Helpers {
    create_require: (),
    module_registry: (),
});

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_marked_helpers_are_generated() {
    let helpers = RuntimeHelpers::new();
    assert!(helpers.generate_helpers().is_empty());
    helpers.module_registry();
    assert_eq!(
      helpers.generate_helpers(),
      vec![include_str!("./snippets/_module_registry.js")]
    );
  }

  #[test]
  fn imports_come_first() {
    let helpers = RuntimeHelpers::new();
    helpers.module_registry();
    helpers.create_require();
    let generated = helpers.generate_helpers();
    assert_eq!(generated.len(), 2);
    assert!(generated[0].starts_with("import "));
  }
}
