mod resource {
    pub mod user;
}

#[cfg(test)]
mod tests {
    use crate::resource::user::{Contact, User, UserTimes, UserView};
    use rowmap::{Attach, Prototype, PrototypeTime, Result, Tagged, project, project_all};
    use time::macros::datetime;
    use uuid::Uuid;

    fn user() -> User {
        User {
            prototype: Prototype {
                id: Some(Uuid::parse_str("5b080758-7ece-4be0-bf37-7f6da5fb1be6").unwrap()),
                time: PrototypeTime {
                    created_at: Some(datetime!(2024-03-04 05:06:07 UTC)),
                    modified_at: Some(datetime!(2024-03-05 05:06:07 +1)),
                },
            },
            identity: "ada".into(),
            name: Some("Ada".into()),
            phone: Some("555-0100".into()),
            age: Some(36),
            session: Some("secret".into()),
        }
    }

    #[test]
    fn project_user() {
        let view: UserView = project(&user()).unwrap();
        assert_eq!(
            view,
            UserView {
                id: "5b080758-7ece-4be0-bf37-7f6da5fb1be6".into(),
                display_name: Some("Ada".into()),
                age: 36,
                times: Some(UserTimes {
                    created: "2024-03-04T05:06:07Z".into(),
                    modified: Some(datetime!(2024-03-05 05:06:07 +1)),
                }),
                contact: Some(Contact {
                    phone: "555-0100".into(),
                }),
                note: "".into(),
            }
        );
    }

    #[test]
    fn unresolved_paths_keep_defaults() {
        let source = User {
            name: None,
            phone: None,
            age: None,
            ..User::default()
        };
        let view: UserView = project(&source).unwrap();
        assert_eq!(view.id, "");
        assert_eq!(view.display_name, None);
        assert_eq!(view.age, 0);
        assert_eq!(view.contact, None);
        // `prototype.time` is present, its fields are not
        assert_eq!(view.times, Some(UserTimes::default()));
    }

    #[test]
    fn project_many_keeps_order() {
        let users = [
            User {
                age: Some(1),
                ..user()
            },
            User {
                age: None,
                phone: None,
                ..user()
            },
            User {
                age: Some(3),
                ..user()
            },
        ];
        let views: Vec<UserView> = project_all(&users).unwrap();
        assert_eq!(views.iter().map(|v| v.age).collect::<Vec<_>>(), [1, 0, 3]);
        for (view, user) in views.iter().zip(&users) {
            assert_eq!(*view, project::<UserView>(user).unwrap());
        }
        let single: Vec<UserView> = project_all([&users[2]]).unwrap();
        assert_eq!(single, [project::<UserView>(&users[2]).unwrap()]);
    }

    #[test]
    fn incompatible_target_is_reported() {
        #[derive(Attach, Default, Debug)]
        struct Wrong {
            #[rowmap(attach = "name")]
            name: i32,
        }
        let error = project::<Wrong>(&user()).unwrap_err();
        assert!(format!("{error:#}").contains("field `name`"), "{error:#}");
    }

    #[test]
    fn manual_attach() {
        #[derive(Default)]
        struct Initials(String);
        impl Attach for Initials {
            fn attach_from(&mut self, source: &dyn Tagged) -> Result<()> {
                if let Some(name) = rowmap::resolve(source, "name") {
                    let name: String = rowmap::coerce(name)?;
                    self.0 = name.split_whitespace().filter_map(|v| v.chars().next()).collect();
                }
                Ok(())
            }
        }
        let source = User {
            name: Some("Ada King Lovelace".into()),
            ..user()
        };
        assert_eq!(project::<Initials>(&source).unwrap().0, "AKL");
    }
}
