use awd::{read_file, read_frames, BlockRegistry, Compression, Limits, WriteOptions, Writer};
use block::{share, BlockHandle, BlockLink, Container, Payload, UvAnimation, IDENTITY};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Plan {
    Container {
        name: String,
        parent: Option<usize>,
    },
    Animation {
        name: String,
        frames: u16,
    },
}

fn plan_strategy() -> impl Strategy<Value = Plan> {
    prop_oneof![
        ("[a-z]{0,12}", prop::option::of(0usize..16))
            .prop_map(|(name, parent)| Plan::Container { name, parent }),
        ("UVANIM_[a-z]{0,8}", 1u16..6).prop_map(|(name, frames)| Plan::Animation { name, frames }),
    ]
}

fn options_strategy() -> impl Strategy<Value = WriteOptions> {
    let compression = prop_oneof![
        Just(Compression::None),
        (0u32..=9).prop_map(|level| Compression::Deflate { level }),
    ];
    (any::<bool>(), compression)
        .prop_map(|(wide, compression)| WriteOptions::new(wide, compression))
}

/// Builds the blocks and wires container parents to any block in the set,
/// including later ones and themselves.
fn build(plans: &[Plan]) -> Vec<BlockHandle> {
    let mut handles: Vec<BlockHandle> = Vec::with_capacity(plans.len());
    let mut parents = Vec::new();
    for plan in plans {
        match plan {
            Plan::Container { name, parent } => {
                let container = share(Container::new(name.as_str()).unwrap());
                if let Some(parent) = parent {
                    parents.push((container.clone(), *parent));
                }
                handles.push(container);
            }
            Plan::Animation { name, frames } => {
                let mut anim = UvAnimation::new(name.as_str(), *frames).unwrap();
                for _ in 0..*frames {
                    anim.append_frame(&IDENTITY).unwrap();
                }
                handles.push(share(anim));
            }
        }
    }

    for (container, parent) in parents {
        let target = BlockLink::from_handle(&handles[parent % handles.len()]);
        container.borrow_mut().set_parent(Some(target)).unwrap();
    }
    handles
}

proptest! {
    #[test]
    fn prop_any_scene_round_trips(
        plans in prop::collection::vec(plan_strategy(), 1..16),
        options in options_strategy(),
    ) {
        let handles = build(&plans);
        let mut registry = BlockRegistry::new();
        for handle in &handles {
            registry.register_handle(handle.clone()).unwrap();
        }

        let bytes = Writer::new(options).encode(&registry).unwrap();
        let limits = Limits::default();
        let (header, frames) = read_frames(&bytes, &limits).unwrap();
        prop_assert_eq!(header.flags.wide_floats(), options.wide_floats);
        prop_assert_eq!(frames.len(), plans.len());

        let file = read_file(&bytes, &limits).unwrap();
        for (index, (plan, block)) in plans.iter().zip(&file.blocks).enumerate() {
            prop_assert_eq!(block.id().raw() as usize, index + 1);
            match (plan, &block.body.payload) {
                (Plan::Container { name, .. }, Payload::Container { .. }) => {
                    prop_assert_eq!(block.name().unwrap_or(""), name.as_str());
                }
                (Plan::Animation { name, frames }, Payload::UvAnimation { frames: chain }) => {
                    prop_assert_eq!(block.name(), Some(name.as_str()));
                    prop_assert_eq!(chain.len(), usize::from(*frames));
                }
                (plan, payload) => prop_assert!(false, "{:?} decoded as {:?}", plan, payload),
            }
        }
    }
}
